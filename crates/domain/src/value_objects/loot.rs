//! Loot value range rolled by loot spawners.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Inclusive range of loot values a defeated monster can drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLootValueRange")]
pub struct LootValueRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawLootValueRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawLootValueRange> for LootValueRange {
    type Error = DomainError;

    fn try_from(raw: RawLootValueRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl LootValueRange {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `min > max` or `min` is negative.
    pub fn new(min: i32, max: i32) -> Result<Self, DomainError> {
        if min < 0 {
            return Err(DomainError::validation("Loot value cannot be negative"));
        }
        if min > max {
            return Err(DomainError::validation(format!(
                "Loot range minimum {} exceeds maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
