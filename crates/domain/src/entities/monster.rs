//! Monster balance data.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{AssetAddress, LootValueRange, MonsterTypeId};

/// Static balance attributes for one monster type.
///
/// Read-only once loaded; the factory copies values out of it while wiring a
/// freshly instantiated monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDescriptor {
    pub type_id: MonsterTypeId,
    pub hit_points: f32,
    pub damage: f32,
    #[serde(default)]
    pub attack_cleavage: f32,
    pub effective_distance: f32,
    pub move_speed: f32,
    pub template: AssetAddress,
    pub loot: LootValueRange,
}

impl MonsterDescriptor {
    /// Check the numeric fields of a descriptor loaded from data files.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when hit points are not positive or
    /// any other attribute is negative or not finite.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.hit_points.is_finite() || self.hit_points <= 0.0 {
            return Err(DomainError::validation(format!(
                "Monster '{}' must have positive hit points",
                self.type_id
            )));
        }
        let attributes = [
            ("damage", self.damage),
            ("attack_cleavage", self.attack_cleavage),
            ("effective_distance", self.effective_distance),
            ("move_speed", self.move_speed),
        ];
        for (name, value) in attributes {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "Monster '{}' has invalid {}: {}",
                    self.type_id, name, value
                )));
            }
        }
        Ok(())
    }
}
