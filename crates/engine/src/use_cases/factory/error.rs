//! Entity factory errors.

use emberfall_domain::AssetAddress;

use crate::infrastructure::ports::{AssetError, StaticDataError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum FactoryError {
    #[error("Static data error: {0}")]
    StaticData(#[from] StaticDataError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// The template lacks a capability this creation must wire.
    #[error("Template {address} has no {capability} capability")]
    MissingCapability {
        address: AssetAddress,
        capability: &'static str,
    },

    /// A monster was requested before any hero exists in this level.
    #[error("Cannot create a monster before the hero is spawned")]
    HeroNotSpawned,

    /// The level was cleaned up while this creation was in flight.
    #[error("Creation of {address} was invalidated by a cleanup")]
    Invalidated { address: AssetAddress },
}

impl FactoryError {
    pub fn missing(address: &AssetAddress, capability: &'static str) -> Self {
        Self::MissingCapability {
            address: address.clone(),
            capability,
        }
    }

    /// True when the requested monster type has no static data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StaticData(e) if e.is_not_found())
    }
}
