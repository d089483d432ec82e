//! Emberfall domain types.
//!
//! Pure data shared by the engine: identifiers, validated keys, spatial value
//! objects, template blueprints, monster balance descriptors and persistent
//! progress. No I/O and no async lives here.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    CapabilitySpec, LootData, MonsterDescriptor, PlayerProgress, PositionOnLevel, ProgressRole,
    Template, TemplateNode, WindowId, WorldData,
};
pub use error::DomainError;
pub use ids::EntityId;
pub use value_objects::{
    AssetAddress, LootValueRange, MonsterTypeId, Rotation, SceneName, SpawnerId, Transform, Vec3,
};
