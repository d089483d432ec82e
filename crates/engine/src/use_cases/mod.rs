//! Use cases - Orchestration of the level lifecycle.
//!
//! - `factory` - Entity creation, wiring and progress registration

pub mod factory;

pub use factory::{AssetAddresses, EntityFactory, FactoryError, FactoryServices, GameFactory};
