//! Process configuration read from the environment.
//!
//! | Variable           | Default                            |
//! |--------------------|------------------------------------|
//! | `ASSET_ROOT`       | `assets/templates`                 |
//! | `STATIC_DATA_PATH` | `assets/static_data/monsters.json` |
//! | `INPUT_MODE`       | `standalone` (or `mobile`)         |
//! | `RNG_SEED`         | unset (system randomness)          |
//! | `START_LEVEL`      | `Main`                             |

use std::path::PathBuf;

use emberfall_domain::{DomainError, SceneName};

use crate::infrastructure::ports::InputMode;
use crate::use_cases::factory::AssetAddresses;

pub const DEFAULT_ASSET_ROOT: &str = "assets/templates";
pub const DEFAULT_STATIC_DATA_PATH: &str = "assets/static_data/monsters.json";
pub const DEFAULT_START_LEVEL: &str = "Main";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub asset_root: PathBuf,
    pub static_data_path: PathBuf,
    pub input_mode: InputMode,
    pub rng_seed: Option<u64>,
    pub start_level: SceneName,
    pub addresses: AssetAddresses,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let input_mode = match get("INPUT_MODE") {
            Some(raw) => raw.parse::<InputMode>().map_err(|_| {
                ConfigError::invalid("INPUT_MODE", format!("expected standalone or mobile, got {raw}"))
            })?,
            None => InputMode::Standalone,
        };

        let rng_seed = get("RNG_SEED")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::invalid("RNG_SEED", e))?;

        let start_level = SceneName::new(
            get("START_LEVEL").unwrap_or_else(|| DEFAULT_START_LEVEL.to_string()),
        )
        .map_err(|e: DomainError| ConfigError::invalid("START_LEVEL", e))?;

        let addresses =
            AssetAddresses::standard().map_err(|e| ConfigError::invalid("addresses", e))?;

        Ok(Self {
            asset_root: get("ASSET_ROOT")
                .unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string())
                .into(),
            static_data_path: get("STATIC_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_STATIC_DATA_PATH.to_string())
                .into(),
            input_mode,
            rng_seed,
            start_level,
            addresses,
        })
    }
}
