//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    assets::{CachingAssetSource, DirectoryTemplateStore},
    input::VirtualInput,
    ports::{InputPort, ProgressPort, RandomPort, StaticDataError, StaticDataPort},
    progress::PersistentProgressStore,
    random::{SeededRandom, SystemRandom},
    settings::AppConfig,
    state_machine::{ChannelStateMachine, LevelRequests},
    static_data::JsonStaticData,
    windows::WindowRegistry,
};
use crate::stores::ProgressRegistry;
use crate::use_cases::{AssetAddresses, EntityFactory, FactoryServices, GameFactory};

/// Main application state.
///
/// Built once at startup. Holds the entity factory and the handles the
/// orchestrator needs next to it; services are never re-wired afterwards.
pub struct App {
    pub factory: Arc<GameFactory>,
    pub registry: Arc<ProgressRegistry>,
    pub static_data: Arc<dyn StaticDataPort>,
    pub progress: Arc<dyn ProgressPort>,
    pub input: Arc<dyn InputPort>,
}

impl App {
    /// Wire the factory to already constructed services.
    pub fn new(services: FactoryServices, addresses: AssetAddresses) -> Self {
        let registry = Arc::new(ProgressRegistry::new());
        let static_data = services.static_data.clone();
        let progress = services.progress.clone();
        let input = services.input.clone();
        let factory = GameFactory::new(services, addresses, registry.clone());

        Self {
            factory,
            registry,
            static_data,
            progress,
            input,
        }
    }

    /// Build the default adapters from configuration.
    ///
    /// Returns the app and the receiving end of level change requests.
    pub async fn from_config(config: &AppConfig) -> Result<(Self, LevelRequests), StaticDataError> {
        let static_data = Arc::new(JsonStaticData::load(&config.static_data_path).await?);

        let random: Arc<dyn RandomPort> = match config.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded random");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(SystemRandom::new()),
        };

        let store = DirectoryTemplateStore::new(&config.asset_root);
        tracing::info!(root = %store.root().display(), "Loading templates from directory");

        let (state_machine, levels) = ChannelStateMachine::channel();
        let services = FactoryServices {
            assets: Arc::new(CachingAssetSource::new(Arc::new(store))),
            static_data,
            random,
            input: Arc::new(VirtualInput::new(config.input_mode)),
            windows: Arc::new(WindowRegistry::new()),
            progress: Arc::new(PersistentProgressStore::new()),
            state_machine: Arc::new(state_machine),
        };

        Ok((Self::new(services, config.addresses.clone()), levels))
    }

    /// The factory as seen by the orchestrator.
    pub fn entity_factory(&self) -> Arc<dyn EntityFactory> {
        self.factory.clone()
    }
}
