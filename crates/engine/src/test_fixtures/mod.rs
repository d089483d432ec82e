//! Test fixtures loader and common test helpers.
//!
//! Templates and monster data are loaded from the crate's `assets/` directory,
//! the same files the demo binary uses.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::FactoryHarness;
//!
//! #[tokio::test]
//! async fn creates_hero() {
//!     let harness = FactoryHarness::new();
//!     let hero = harness.factory.create_hero(Vec3::ZERO).await.unwrap();
//!     // ... test logic
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use emberfall_domain::{
    AssetAddress, CapabilitySpec, EntityId, MonsterDescriptor, MonsterTypeId, Template,
    TemplateNode, Vec3,
};
use tokio::sync::Notify;

use crate::entities::ParentRef;
use crate::infrastructure::assets::{CachingAssetSource, InMemoryTemplateStore};
use crate::infrastructure::input::VirtualInput;
use crate::infrastructure::ports::{
    AssetError, AssetSource, InputMode, StaticDataPort, TemplateStore,
};
use crate::infrastructure::progress::PersistentProgressStore;
use crate::infrastructure::random::FixedRandom;
use crate::infrastructure::state_machine::{ChannelStateMachine, LevelRequests};
use crate::infrastructure::static_data::JsonStaticData;
use crate::infrastructure::windows::WindowRegistry;
use crate::stores::ProgressRegistry;
use crate::use_cases::factory::{AssetAddresses, FactoryServices, GameFactory};

/// Value every loot roll returns in the harness.
pub const ROLLED_LOOT: i32 = 3;

// =============================================================================
// Fixture Loading
// =============================================================================

/// Load a JSON fixture from the `assets/` directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read or parsed.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(path);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture '{}': {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Failed to parse fixture '{}': {}",
            fixture_path.display(),
            e
        )
    })
}

pub fn address(key: &str) -> AssetAddress {
    AssetAddress::new(key).expect("valid address")
}

pub fn type_id(key: &str) -> MonsterTypeId {
    MonsterTypeId::new(key).expect("valid type id")
}

/// Template shipped under `assets/templates/<key>.json`.
pub fn template(key: &str) -> Template {
    load_fixture(&format!("templates/{key}.json"))
}

pub fn standard_templates() -> Vec<Template> {
    [
        "hero",
        "hud",
        "loot",
        "spawner",
        "level_transfer_trigger",
        "goblin",
        "bat",
    ]
    .into_iter()
    .map(template)
    .collect()
}

pub fn monsters() -> Vec<MonsterDescriptor> {
    load_fixture("static_data/monsters.json")
}

pub fn goblin() -> MonsterDescriptor {
    monsters()
        .into_iter()
        .find(|m| m.type_id.as_str() == "goblin")
        .expect("goblin fixture")
}

/// Monster template with only the capabilities creation requires.
pub fn bare_monster_template(key: &str) -> Template {
    Template::new(
        address(key),
        TemplateNode::new(key)
            .with_capability(CapabilitySpec::Health { max: 0.0 })
            .with_capability(CapabilitySpec::Attack),
    )
}

/// A descriptor for `key` using the bare template of the same name.
pub fn bare_monster(key: &str) -> MonsterDescriptor {
    MonsterDescriptor {
        type_id: type_id(key),
        template: address(key),
        ..goblin()
    }
}

pub fn parent_at(position: Vec3) -> ParentRef {
    ParentRef::new(EntityId::new(), position)
}

// =============================================================================
// Factory Harness
// =============================================================================

/// A factory wired to real in-memory adapters, with handles to each of them.
pub struct FactoryHarness {
    pub factory: Arc<GameFactory>,
    pub services: FactoryServices,
    pub registry: Arc<ProgressRegistry>,
    pub assets: Arc<CachingAssetSource>,
    pub input: Arc<VirtualInput>,
    pub windows: Arc<WindowRegistry>,
    pub progress: Arc<PersistentProgressStore>,
    pub levels: LevelRequests,
}

impl FactoryHarness {
    pub fn new() -> Self {
        Self::with_templates(standard_templates())
    }

    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self::with_store(Arc::new(InMemoryTemplateStore::new(templates)))
    }

    pub fn with_store(store: Arc<dyn TemplateStore>) -> Self {
        let static_data =
            JsonStaticData::from_descriptors(monsters()).expect("monster fixtures are valid");
        Self::build(store, Arc::new(static_data))
    }

    pub fn build(store: Arc<dyn TemplateStore>, static_data: Arc<dyn StaticDataPort>) -> Self {
        let assets = Arc::new(CachingAssetSource::new(store));
        let input = Arc::new(VirtualInput::new(InputMode::Standalone));
        let windows = Arc::new(WindowRegistry::new());
        let progress = Arc::new(PersistentProgressStore::new());
        let (state_machine, levels) = ChannelStateMachine::channel();
        let registry = Arc::new(ProgressRegistry::new());

        let services = FactoryServices {
            assets: assets.clone(),
            static_data,
            random: Arc::new(FixedRandom(ROLLED_LOOT)),
            input: input.clone(),
            windows: windows.clone(),
            progress: progress.clone(),
            state_machine: Arc::new(state_machine),
        };
        let addresses = AssetAddresses::standard().expect("standard addresses");
        let factory = GameFactory::new(services.clone(), addresses, registry.clone());

        Self {
            factory,
            services,
            registry,
            assets,
            input,
            windows,
            progress,
            levels,
        }
    }

    pub async fn counts(&self) -> (usize, usize) {
        (
            self.registry.reader_count().await,
            self.registry.writer_count().await,
        )
    }
}

// =============================================================================
// Gated Store
// =============================================================================

/// Template store that holds the fetch of one address until released.
///
/// `started` is notified when that fetch begins; the fetch then waits on
/// `release`.
pub struct GatedTemplateStore {
    inner: InMemoryTemplateStore,
    gated: AssetAddress,
    pub started: Notify,
    pub release: Notify,
}

impl GatedTemplateStore {
    pub fn new(templates: Vec<Template>, gated: &str) -> Self {
        Self {
            inner: InMemoryTemplateStore::new(templates),
            gated: address(gated),
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl TemplateStore for GatedTemplateStore {
    async fn fetch(&self, address: &AssetAddress) -> Result<Template, AssetError> {
        if *address == self.gated {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch(address).await
    }
}

/// Asset source whose `cleanup` waits for `release` before dropping the cache.
///
/// `started` is notified when a cleanup reaches the asset source.
pub struct GatedCleanupAssets {
    inner: Arc<CachingAssetSource>,
    pub started: Notify,
    pub release: Notify,
}

impl GatedCleanupAssets {
    pub fn new(inner: Arc<CachingAssetSource>) -> Self {
        Self {
            inner,
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl AssetSource for GatedCleanupAssets {
    async fn load(&self, address: &AssetAddress) -> Result<Arc<Template>, AssetError> {
        self.inner.load(address).await
    }

    async fn cleanup(&self) {
        self.started.notify_one();
        self.release.notified().await;
        self.inner.cleanup().await;
    }
}
