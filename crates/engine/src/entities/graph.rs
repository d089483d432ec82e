//! Instantiated entity graphs.
//!
//! A template is turned into a tree of [`EntityNode`]s, each with its own id,
//! world transform and [`Capabilities`] table. The factory wires the tree while
//! it still owns it, then freezes it into an [`Entity`] shared as
//! [`EntityHandle`].

use std::sync::{Arc, Weak};

use emberfall_domain::{AssetAddress, EntityId, Template, TemplateNode, Transform, Vec3};

use super::capabilities::Capabilities;

/// Shared handle to a frozen, fully wired entity.
pub type EntityHandle = Arc<Entity>;

/// Where a child entity gets attached: the parent's node id and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentRef {
    pub id: EntityId,
    pub position: Vec3,
}

impl ParentRef {
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// Non-owning reference to another entity (e.g. the hero an attack aims at).
#[derive(Debug, Clone)]
pub struct TargetRef {
    id: EntityId,
    entity: Weak<Entity>,
}

impl TargetRef {
    pub fn new(entity: &EntityHandle) -> Self {
        Self {
            id: entity.id(),
            entity: Arc::downgrade(entity),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The target, if it is still alive.
    pub fn upgrade(&self) -> Option<EntityHandle> {
        self.entity.upgrade()
    }
}

/// One live node of an instantiated graph.
#[derive(Debug)]
pub struct EntityNode {
    id: EntityId,
    name: String,
    transform: Transform,
    parent: Option<EntityId>,
    capabilities: Capabilities,
    children: Vec<EntityNode>,
}

impl EntityNode {
    /// Instantiate `template` with its root placed exactly at `transform`.
    ///
    /// Every node gets a fresh id; child positions are the parent position plus
    /// the child's template offset. The root's own offset is ignored.
    pub fn instantiate(template: &Template, transform: Transform, parent: Option<EntityId>) -> Self {
        Self::from_template(&template.root, transform, parent)
    }

    fn from_template(node: &TemplateNode, transform: Transform, parent: Option<EntityId>) -> Self {
        let id = EntityId::new();
        let capabilities = Capabilities::from_specs(
            &node.capabilities,
            node.progress,
            ParentRef::new(id, transform.position),
        );
        let children = node
            .children
            .iter()
            .map(|child| Self::from_template(child, transform.offset_by(child.offset), Some(id)))
            .collect();

        Self {
            id,
            name: node.name.clone(),
            transform,
            parent,
            capabilities,
            children,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    pub fn children(&self) -> &[EntityNode] {
        &self.children
    }

    /// All nodes of this subtree in pre-order (this node first).
    pub fn nodes(&self) -> Vec<&EntityNode> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes<'a>(&'a self, out: &mut Vec<&'a EntityNode>) {
        out.push(self);
        for child in &self.children {
            child.collect_nodes(out);
        }
    }

    /// Capability tables of this subtree in pre-order (this node first).
    ///
    /// Single wiring takes the first match from the sequence, broadcast wiring
    /// iterates all of it.
    pub fn capability_tables_mut(&mut self) -> Vec<&mut Capabilities> {
        let mut out = Vec::new();
        Self::collect_tables(self, &mut out);
        out
    }

    fn collect_tables<'a>(node: &'a mut EntityNode, out: &mut Vec<&'a mut Capabilities>) {
        out.push(&mut node.capabilities);
        for child in node.children.iter_mut() {
            Self::collect_tables(child, out);
        }
    }
}

/// A frozen entity graph created from a template.
#[derive(Debug)]
pub struct Entity {
    address: AssetAddress,
    root: EntityNode,
}

impl Entity {
    pub fn new(address: AssetAddress, root: EntityNode) -> Self {
        Self { address, root }
    }

    /// Id of the root node.
    pub fn id(&self) -> EntityId {
        self.root.id
    }

    /// Address of the template this entity was created from.
    pub fn address(&self) -> &AssetAddress {
        &self.address
    }

    pub fn root(&self) -> &EntityNode {
        &self.root
    }

    pub fn transform(&self) -> Transform {
        self.root.transform
    }

    pub fn nodes(&self) -> Vec<&EntityNode> {
        self.root.nodes()
    }

    /// First capability in the graph selected by `pick`, searching root first.
    pub fn first<'a, T: 'a>(
        &'a self,
        pick: impl Fn(&'a Capabilities) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.nodes()
            .into_iter()
            .find_map(|node| pick(&node.capabilities))
    }

    /// Every capability in the graph selected by `pick`, in pre-order.
    pub fn all<'a, T: 'a>(&'a self, pick: impl Fn(&'a Capabilities) -> &'a [T]) -> Vec<&'a T> {
        self.nodes()
            .into_iter()
            .flat_map(|node| pick(&node.capabilities).iter())
            .collect()
    }
}
