//! Template sources.
//!
//! `CachingAssetSource` sits in front of a raw [`TemplateStore`] and keeps one
//! cell per address, so concurrent loads of the same address share a single
//! fetch. Failed fetches leave the cell empty and are retried on the next load.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use emberfall_domain::{AssetAddress, Template};
use tokio::sync::{OnceCell, RwLock};

use crate::infrastructure::ports::{AssetError, AssetSource, TemplateStore};

type Slot = Arc<OnceCell<Arc<Template>>>;

/// Asset source caching loaded templates per address.
pub struct CachingAssetSource {
    store: Arc<dyn TemplateStore>,
    cache: RwLock<HashMap<AssetAddress, Slot>>,
    misses: AtomicUsize,
}

impl CachingAssetSource {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
            misses: AtomicUsize::new(0),
        }
    }

    /// Number of loads that had to go to the store.
    pub fn miss_count(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub async fn is_cached(&self, address: &AssetAddress) -> bool {
        self.cache
            .read()
            .await
            .get(address)
            .is_some_and(|slot| slot.initialized())
    }

    pub async fn cached_count(&self) -> usize {
        self.cache
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    async fn slot(&self, address: &AssetAddress) -> Slot {
        if let Some(slot) = self.cache.read().await.get(address) {
            return slot.clone();
        }
        self.cache
            .write()
            .await
            .entry(address.clone())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl AssetSource for CachingAssetSource {
    async fn load(&self, address: &AssetAddress) -> Result<Arc<Template>, AssetError> {
        let slot = self.slot(address).await;
        if let Some(template) = slot.get() {
            tracing::debug!(address = %address, "Template cache hit");
            return Ok(template.clone());
        }

        let template = slot
            .get_or_try_init(|| async {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(address = %address, "Template cache miss");
                self.store.fetch(address).await.map(Arc::new)
            })
            .await?;
        Ok(template.clone())
    }

    async fn cleanup(&self) {
        let mut cache = self.cache.write().await;
        let released = cache.len();
        cache.clear();
        tracing::debug!(released, "Released cached templates");
    }
}

/// Reads `<root>/<address>.json`.
pub struct DirectoryTemplateStore {
    root: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, address: &AssetAddress) -> Result<PathBuf, AssetError> {
        let relative = Path::new(address.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(AssetError::not_found(address));
        }
        Ok(self.root.join(format!("{}.json", address.as_str())))
    }
}

#[async_trait]
impl TemplateStore for DirectoryTemplateStore {
    async fn fetch(&self, address: &AssetAddress) -> Result<Template, AssetError> {
        let path = self.path_for(address)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AssetError::not_found(address));
            }
            Err(e) => return Err(AssetError::io(address, e)),
        };

        let template: Template =
            serde_json::from_str(&raw).map_err(|e| AssetError::parse(address, e))?;
        if &template.address != address {
            return Err(AssetError::parse(
                address,
                format!("file declares address {}", template.address),
            ));
        }
        Ok(template)
    }
}

/// Fixed set of templates held in memory.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: HashMap<AssetAddress, Template>,
}

impl InMemoryTemplateStore {
    pub fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.address.clone(), t))
                .collect(),
        }
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn fetch(&self, address: &AssetAddress) -> Result<Template, AssetError> {
        self.templates
            .get(address)
            .cloned()
            .ok_or_else(|| AssetError::not_found(address))
    }
}
