//! Live entity graphs.
//!
//! - `graph` - Instantiated node trees and frozen entities
//! - `capabilities` - Per-node capability table and capability behaviour

pub mod capabilities;
pub mod graph;

pub use capabilities::{
    ActorUi, Attack, Capabilities, CapabilityError, Health, HeroAttack, HeroMove,
    LevelTransferTrigger, LootCounter, LootPiece, LootSpawner, MoveToTarget, OpenWindowButton,
    RotateToTarget, SpawnPoint,
};
pub use graph::{Entity, EntityHandle, EntityNode, ParentRef, TargetRef};
