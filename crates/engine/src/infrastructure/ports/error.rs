//! Error types for port operations.

use emberfall_domain::{AssetAddress, DomainError, MonsterTypeId};

/// Template loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    /// No template is published under the address.
    #[error("Template not found: {address}")]
    NotFound { address: AssetAddress },

    /// Reading the template source failed.
    #[error("I/O error loading {address}: {message}")]
    Io {
        address: AssetAddress,
        message: String,
    },

    /// The template source could not be decoded.
    #[error("Invalid template {address}: {message}")]
    Parse {
        address: AssetAddress,
        message: String,
    },
}

impl AssetError {
    pub fn not_found(address: &AssetAddress) -> Self {
        Self::NotFound {
            address: address.clone(),
        }
    }

    pub fn io(address: &AssetAddress, message: impl ToString) -> Self {
        Self::Io {
            address: address.clone(),
            message: message.to_string(),
        }
    }

    pub fn parse(address: &AssetAddress, message: impl ToString) -> Self {
        Self::Parse {
            address: address.clone(),
            message: message.to_string(),
        }
    }

    pub fn address(&self) -> &AssetAddress {
        match self {
            Self::NotFound { address } | Self::Io { address, .. } | Self::Parse { address, .. } => {
                address
            }
        }
    }
}

/// Static balance data errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StaticDataError {
    /// Lookup for a type id that was never registered.
    #[error("No static data for monster type: {type_id}")]
    NotFound { type_id: MonsterTypeId },

    #[error("Failed to read static data: {0}")]
    Io(String),

    #[error("Failed to parse static data: {0}")]
    Parse(String),

    #[error("Duplicate static data for monster type: {type_id}")]
    Duplicate { type_id: MonsterTypeId },

    #[error("Invalid static data: {0}")]
    Invalid(#[from] DomainError),
}

impl StaticDataError {
    pub fn not_found(type_id: &MonsterTypeId) -> Self {
        Self::NotFound {
            type_id: type_id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors talking to the game state machine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StateMachineError {
    #[error("State machine is no longer accepting requests")]
    Closed,
}
