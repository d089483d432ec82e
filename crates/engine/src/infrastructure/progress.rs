//! Persistent progress holder.

use std::sync::Arc;

use emberfall_domain::PlayerProgress;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{ProgressPort, WorldDataHandle};

/// Owns the player's progress for the session. Loot and HUD entities share
/// its world data through [`WorldDataHandle`].
#[derive(Default)]
pub struct PersistentProgressStore {
    world_data: WorldDataHandle,
}

impl PersistentProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved progress.
    pub fn from_progress(progress: PlayerProgress) -> Self {
        Self {
            world_data: Arc::new(RwLock::new(progress.world_data)),
        }
    }

    /// Copy of the current progress, for the save pass.
    pub async fn snapshot(&self) -> PlayerProgress {
        PlayerProgress {
            world_data: self.world_data.read().await.clone(),
        }
    }
}

impl ProgressPort for PersistentProgressStore {
    fn world_data(&self) -> WorldDataHandle {
        self.world_data.clone()
    }
}
