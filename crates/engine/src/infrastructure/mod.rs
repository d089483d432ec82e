//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod assets;
pub mod input;
pub mod ports;
pub mod progress;
pub mod random;
pub mod settings;
pub mod state_machine;
pub mod static_data;
pub mod windows;
