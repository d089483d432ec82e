//! Addressable entity blueprints.
//!
//! A template declares its capability set up front: every node lists the
//! capabilities it carries and whether it takes part in saving progress.
//! Nothing is discovered by inspecting a live object afterwards.

use serde::{Deserialize, Serialize};

use crate::value_objects::{AssetAddress, SceneName, Vec3};

/// UI windows a HUD button can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowId {
    Shop,
    Settings,
}

/// How a node participates in persisted progress.
///
/// A writer always reads as well, so the writer set can never escape the
/// reader set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressRole {
    /// Restores its state from saved progress.
    Reader,
    /// Restores from and writes back to saved progress.
    Writer,
}

impl ProgressRole {
    pub fn is_reader(&self) -> bool {
        true
    }

    pub fn is_writer(&self) -> bool {
        matches!(self, Self::Writer)
    }
}

/// A capability a template node declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapabilitySpec {
    Health {
        #[serde(default)]
        max: f32,
    },
    ActorUi,
    HeroMove,
    HeroAttack,
    Attack,
    MoveToTarget,
    RotateToTarget,
    LootSpawner,
    SpawnPoint,
    LootPiece,
    LootCounter,
    OpenWindowButton {
        window: WindowId,
    },
    LevelTransferTrigger {
        transfer_to: SceneName,
    },
}

/// One node of a template's object graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub name: String,
    /// Offset from the parent node. Ignored on the root, which is placed at the
    /// requested position.
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub capabilities: Vec<CapabilitySpec>,
    #[serde(default)]
    pub progress: Option<ProgressRole>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Vec3::ZERO,
            capabilities: Vec::new(),
            progress: None,
            children: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: CapabilitySpec) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_progress(mut self, role: ProgressRole) -> Self {
        self.progress = Some(role);
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TemplateNode::node_count)
            .sum::<usize>()
    }
}

/// A loaded blueprint. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub address: AssetAddress,
    pub root: TemplateNode,
}

impl Template {
    pub fn new(address: AssetAddress, root: TemplateNode) -> Self {
        Self { address, root }
    }
}
