//! Collaborator ports used by the entity factory.

use std::sync::Arc;

use async_trait::async_trait;
use emberfall_domain::{
    AssetAddress, MonsterDescriptor, MonsterTypeId, SceneName, Template, Transform, Vec3,
    WindowId, WorldData,
};
use tokio::sync::RwLock;

use super::error::{AssetError, StateMachineError, StaticDataError};
use crate::entities::EntityNode;

/// Shared handle to the persistent world data loot and HUD entities write to.
pub type WorldDataHandle = Arc<RwLock<WorldData>>;

// =============================================================================
// Asset Ports
// =============================================================================

/// Resolves template addresses, caching what it loads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Load (or return the cached) template for `address`.
    async fn load(&self, address: &AssetAddress) -> Result<Arc<Template>, AssetError>;

    /// Load `address` and instantiate it as a root entity at `at` (origin when `None`).
    async fn instantiate(
        &self,
        address: &AssetAddress,
        at: Option<Vec3>,
    ) -> Result<EntityNode, AssetError> {
        let template = self.load(address).await?;
        Ok(EntityNode::instantiate(
            &template,
            Transform::at(at.unwrap_or_default()),
            None,
        ))
    }

    /// Release every cached template.
    async fn cleanup(&self);
}

/// Uncached template fetch. Wrapped by the caching asset source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn fetch(&self, address: &AssetAddress) -> Result<Template, AssetError>;
}

// =============================================================================
// Static Data Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait StaticDataPort: Send + Sync {
    fn monster(&self, type_id: &MonsterTypeId) -> Result<MonsterDescriptor, StaticDataError>;

    /// Every registered monster type, sorted.
    fn monster_types(&self) -> Vec<MonsterTypeId>;
}

// =============================================================================
// Runtime Service Ports
// =============================================================================

/// Which physical input the player uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Standalone,
    Mobile,
}

impl std::str::FromStr for InputMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standalone" | "desktop" => Ok(Self::Standalone),
            "mobile" | "touch" => Ok(Self::Mobile),
            _ => Err(()),
        }
    }
}

pub trait InputPort: Send + Sync {
    fn mode(&self) -> InputMode;
    /// Movement axis in world space; zero when idle.
    fn axis(&self) -> Vec3;
    fn is_attack_pressed(&self) -> bool;
}

#[cfg_attr(test, mockall::automock)]
pub trait WindowPort: Send + Sync {
    fn open(&self, window: WindowId);
}

/// Holder of the player's persistent progress.
pub trait ProgressPort: Send + Sync {
    fn world_data(&self) -> WorldDataHandle;
}

/// The sequencer that decides which level runs next.
#[cfg_attr(test, mockall::automock)]
pub trait GameStateMachine: Send + Sync {
    fn enter_level(&self, scene: &SceneName) -> Result<(), StateMachineError>;
}
