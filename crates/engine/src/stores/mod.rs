//! In-memory state storage modules.
//!
//! Stores manage per-level runtime state:
//! - `ProgressRegistry` - Entities taking part in progress save/restore

pub mod progress_registry;

pub use progress_registry::{ProgressEntry, ProgressRegistry, StaleGeneration};
