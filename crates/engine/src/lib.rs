//! Emberfall Engine library.
//!
//! Creates game entities from templates, wires them to runtime services and
//! tracks which of them take part in progress save/restore.
//!
//! ## Structure
//!
//! - `entities/` - Live entity graphs and their capability tables
//! - `stores/` - Per-level runtime state (progress registry)
//! - `use_cases/` - Entity factory
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures module for unit and integration testing.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
