//! Validated name newtypes
//!
//! These newtypes ensure that keys are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for any key or identifier string
const MAX_KEY_LENGTH: usize = 200;

macro_rules! validated_name {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new validated ", $label, ".")]
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after
            /// trimming or exceeds 200 characters.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.len() > MAX_KEY_LENGTH {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label, MAX_KEY_LENGTH
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

validated_name!(
    /// Address of a loadable template, e.g. `"hero"` or `"monsters/goblin"`.
    AssetAddress,
    "Asset address"
);

validated_name!(
    /// Key into the monster balance table, e.g. `"goblin"`.
    MonsterTypeId,
    "Monster type id"
);

validated_name!(
    /// Stable identifier of a spawn point, used by the save pass to remember
    /// which spawners were already cleared.
    SpawnerId,
    "Spawner id"
);

validated_name!(
    /// Name of a level/scene the orchestrator can transition to.
    SceneName,
    "Scene name"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let id = MonsterTypeId::new("  goblin ").unwrap();
        assert_eq!(id.as_str(), "goblin");
    }

    #[test]
    fn rejects_empty() {
        let err = AssetAddress::new("   ").unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Asset address cannot be empty")
        );
    }

    #[test]
    fn rejects_too_long() {
        let long = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(SpawnerId::new(long).is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: SceneName = serde_json::from_str("\"Main\"").unwrap();
        assert_eq!(ok.as_str(), "Main");

        let bad: Result<SceneName, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
