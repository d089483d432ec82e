//! Persistent progress data shared with loot and HUD entities.

use serde::{Deserialize, Serialize};

use crate::value_objects::{SceneName, Vec3};

/// Loot the player has picked up across the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootData {
    pub collected: i32,
}

impl LootData {
    pub fn collect(&mut self, value: i32) {
        self.collected = self.collected.saturating_add(value);
    }
}

/// Where the hero was last saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionOnLevel {
    pub level: SceneName,
    pub position: Vec3,
}

/// World-scoped part of the player's progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    pub loot: LootData,
    #[serde(default)]
    pub position_on_level: Option<PositionOnLevel>,
}

/// Everything the save pass persists for a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub world_data: WorldData,
}
