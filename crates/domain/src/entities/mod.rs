//! Domain entities: templates, balance descriptors and progress data.

pub mod monster;
pub mod progress;
pub mod template;

pub use monster::MonsterDescriptor;
pub use progress::{LootData, PlayerProgress, PositionOnLevel, WorldData};
pub use template::{CapabilitySpec, ProgressRole, Template, TemplateNode, WindowId};
