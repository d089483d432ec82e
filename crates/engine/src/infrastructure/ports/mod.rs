//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Template loading (could swap JSON files -> packed bundles)
//! - Static balance data
//! - Runtime services injected into entities (input, windows, progress)
//! - The level state machine
//! - Random (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// Collaborator Ports
// =============================================================================
pub use external::{
    AssetSource, GameStateMachine, InputMode, InputPort, ProgressPort, StaticDataPort,
    TemplateStore, WindowPort, WorldDataHandle,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockAssetSource, MockGameStateMachine, MockStaticDataPort, MockTemplateStore, MockWindowPort,
};

#[cfg(test)]
pub use testing::MockRandomPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::RandomPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AssetError, StateMachineError, StaticDataError};
