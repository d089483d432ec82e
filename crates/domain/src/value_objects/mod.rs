//! Value objects - Immutable objects defined by their attributes

mod loot;
mod names;
mod spatial;

pub use loot::LootValueRange;
pub use names::{AssetAddress, MonsterTypeId, SceneName, SpawnerId};
pub use spatial::{Rotation, Transform, Vec3};
