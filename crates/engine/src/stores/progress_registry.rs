//! Progress registry.
//!
//! Ordered lists of the entity nodes that read and write persistent progress.
//! A later save/restore pass walks these lists in insertion order.

use std::collections::HashSet;

use emberfall_domain::{EntityId, ProgressRole};
use tokio::sync::RwLock;

use crate::entities::EntityHandle;

/// One registered progress participant: a node of an entity graph.
#[derive(Debug, Clone)]
pub struct ProgressEntry {
    pub node_id: EntityId,
    pub role: ProgressRole,
    pub entity: EntityHandle,
}

/// Registration was refused because a cleanup ran since the creation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleGeneration {
    pub expected: u64,
    pub current: u64,
}

#[derive(Default)]
struct Lists {
    readers: Vec<ProgressEntry>,
    writers: Vec<ProgressEntry>,
    known: HashSet<EntityId>,
    generation: u64,
}

/// Reader and writer lists of the current level.
///
/// Both lists live behind one lock, so a writer is visible in both or in
/// neither, and cleanup empties them together.
#[derive(Default)]
pub struct ProgressRegistry {
    lists: RwLock<Lists>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Bumped by every [`cleanup`](Self::cleanup).
    pub async fn generation(&self) -> u64 {
        self.lists.read().await.generation
    }

    /// Register every node of `entity` that declares a progress role.
    ///
    /// Writers are appended to both lists. Nodes registered before are
    /// skipped. Returns the number of newly registered nodes.
    pub async fn register(
        &self,
        entity: &EntityHandle,
        expected_generation: u64,
    ) -> Result<usize, StaleGeneration> {
        let mut lists = self.lists.write().await;
        if lists.generation != expected_generation {
            return Err(StaleGeneration {
                expected: expected_generation,
                current: lists.generation,
            });
        }

        let mut added = 0;
        for node in entity.nodes() {
            let Some(role) = node.capabilities().progress else {
                continue;
            };
            if !lists.known.insert(node.id()) {
                continue;
            }

            let entry = ProgressEntry {
                node_id: node.id(),
                role,
                entity: entity.clone(),
            };
            if role.is_writer() {
                lists.writers.push(entry.clone());
            }
            lists.readers.push(entry);
            added += 1;
        }

        if added > 0 {
            tracing::debug!(
                entity_id = %entity.id(),
                address = %entity.address(),
                added,
                "Registered progress participants"
            );
        }
        Ok(added)
    }

    /// Empty both lists and start a new generation. Entities are not destroyed.
    pub async fn cleanup(&self) {
        let mut lists = self.lists.write().await;
        lists.readers.clear();
        lists.writers.clear();
        lists.known.clear();
        lists.generation += 1;
        tracing::debug!(generation = lists.generation, "Progress registry cleared");
    }

    pub async fn readers(&self) -> Vec<ProgressEntry> {
        self.lists.read().await.readers.clone()
    }

    pub async fn writers(&self) -> Vec<ProgressEntry> {
        self.lists.read().await.writers.clone()
    }

    pub async fn reader_count(&self) -> usize {
        self.lists.read().await.readers.len()
    }

    pub async fn writer_count(&self) -> usize {
        self.lists.read().await.writers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entities::{Entity, EntityNode};
    use emberfall_domain::{AssetAddress, Template, TemplateNode, Transform};

    fn entity(root: TemplateNode) -> EntityHandle {
        let address = AssetAddress::new("test").unwrap();
        let template = Template::new(address.clone(), root);
        let node = EntityNode::instantiate(&template, Transform::default(), None);
        Arc::new(Entity::new(address, node))
    }

    fn ids(entries: &[ProgressEntry]) -> Vec<EntityId> {
        entries.iter().map(|e| e.node_id).collect()
    }

    #[tokio::test]
    async fn writer_is_also_reader() {
        let registry = ProgressRegistry::new();
        let hero = entity(TemplateNode::new("Hero").with_progress(ProgressRole::Writer));
        let hud = entity(TemplateNode::new("Hud").with_progress(ProgressRole::Reader));

        registry.register(&hero, 0).await.unwrap();
        registry.register(&hud, 0).await.unwrap();

        let readers = ids(&registry.readers().await);
        let writers = ids(&registry.writers().await);
        assert_eq!(readers, vec![hero.id(), hud.id()]);
        assert_eq!(writers, vec![hero.id()]);
        assert!(writers.iter().all(|w| readers.contains(w)));
    }

    #[tokio::test]
    async fn registration_is_idempotent() {
        let registry = ProgressRegistry::new();
        let hero = entity(TemplateNode::new("Hero").with_progress(ProgressRole::Writer));

        assert_eq!(registry.register(&hero, 0).await.unwrap(), 1);
        assert_eq!(registry.register(&hero, 0).await.unwrap(), 0);
        assert_eq!(registry.reader_count().await, 1);
        assert_eq!(registry.writer_count().await, 1);
    }

    #[tokio::test]
    async fn every_declaring_node_is_an_entry() {
        let registry = ProgressRegistry::new();
        let graph = entity(
            TemplateNode::new("Root")
                .with_child(TemplateNode::new("Saver").with_progress(ProgressRole::Writer))
                .with_child(TemplateNode::new("Plain"))
                .with_child(TemplateNode::new("Display").with_progress(ProgressRole::Reader)),
        );

        assert_eq!(registry.register(&graph, 0).await.unwrap(), 2);
        assert_eq!(registry.reader_count().await, 2);
        assert_eq!(registry.writer_count().await, 1);
    }

    #[tokio::test]
    async fn entity_without_roles_adds_nothing() {
        let registry = ProgressRegistry::new();
        let rock = entity(TemplateNode::new("Rock"));
        assert_eq!(registry.register(&rock, 0).await.unwrap(), 0);
        assert_eq!(registry.reader_count().await, 0);
    }

    #[tokio::test]
    async fn cleanup_empties_and_advances_generation() {
        let registry = ProgressRegistry::new();
        let hero = entity(TemplateNode::new("Hero").with_progress(ProgressRole::Writer));
        registry.register(&hero, 0).await.unwrap();

        registry.cleanup().await;
        registry.cleanup().await;

        assert_eq!(registry.reader_count().await, 0);
        assert_eq!(registry.writer_count().await, 0);
        assert_eq!(registry.generation().await, 2);
    }

    #[tokio::test]
    async fn stale_generation_is_refused() {
        let registry = ProgressRegistry::new();
        let started = registry.generation().await;
        registry.cleanup().await;

        let hero = entity(TemplateNode::new("Hero").with_progress(ProgressRole::Writer));
        let err = registry.register(&hero, started).await.unwrap_err();
        assert_eq!(
            err,
            StaleGeneration {
                expected: 0,
                current: 1
            }
        );
        assert_eq!(registry.reader_count().await, 0);
    }

    #[tokio::test]
    async fn same_entity_registers_again_after_cleanup() {
        let registry = ProgressRegistry::new();
        let hero = entity(TemplateNode::new("Hero").with_progress(ProgressRole::Reader));
        registry.register(&hero, 0).await.unwrap();
        registry.cleanup().await;
        assert_eq!(registry.register(&hero, 1).await.unwrap(), 1);
    }
}
