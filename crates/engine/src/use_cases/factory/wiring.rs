//! Capability lookup helpers used while wiring an instantiated graph.
//!
//! Single wiring takes the first matching capability in pre-order, broadcast
//! wiring visits every match. Required capabilities turn absence into
//! [`FactoryError::MissingCapability`].

use emberfall_domain::AssetAddress;

use super::FactoryError;
use crate::entities::{Capabilities, EntityNode};

/// First capability in the subtree selected by `pick`, root first.
pub(super) fn first_mut<'a, T>(
    node: &'a mut EntityNode,
    pick: impl FnMut(&'a mut Capabilities) -> Option<&'a mut T>,
) -> Option<&'a mut T> {
    node.capability_tables_mut().into_iter().find_map(pick)
}

/// Like [`first_mut`], but the capability must exist.
pub(super) fn require_mut<'a, T>(
    node: &'a mut EntityNode,
    address: &AssetAddress,
    capability: &'static str,
    pick: impl FnMut(&'a mut Capabilities) -> Option<&'a mut T>,
) -> Result<&'a mut T, FactoryError> {
    first_mut(node, pick).ok_or_else(|| FactoryError::missing(address, capability))
}

/// Apply `wire` to every capability in the subtree selected by `pick`.
/// Returns how many were wired.
pub(super) fn broadcast<T>(
    node: &mut EntityNode,
    mut pick: impl FnMut(&mut Capabilities) -> &mut [T],
    mut wire: impl FnMut(&mut T),
) -> usize {
    let mut wired = 0;
    for table in node.capability_tables_mut() {
        for capability in pick(table).iter_mut() {
            wire(capability);
            wired += 1;
        }
    }
    wired
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberfall_domain::{CapabilitySpec, Template, TemplateNode, Transform, WindowId};

    fn node() -> EntityNode {
        let template = Template::new(
            AssetAddress::new("hud").unwrap(),
            TemplateNode::new("Hud")
                .with_child(
                    TemplateNode::new("Counter")
                        .with_capability(CapabilitySpec::LootCounter)
                        .with_capability(CapabilitySpec::OpenWindowButton {
                            window: WindowId::Shop,
                        }),
                )
                .with_child(TemplateNode::new("Counter2").with_capability(
                    CapabilitySpec::OpenWindowButton {
                        window: WindowId::Settings,
                    },
                )),
        );
        EntityNode::instantiate(&template, Transform::default(), None)
    }

    #[test]
    fn first_mut_searches_children() {
        let mut node = node();
        assert!(first_mut(&mut node, |c| c.loot_counter.as_mut()).is_some());
        assert!(first_mut(&mut node, |c| c.health.as_mut()).is_none());
    }

    #[test]
    fn require_mut_reports_missing_capability() {
        let mut node = node();
        let address = AssetAddress::new("hud").unwrap();
        let err = require_mut(&mut node, &address, "health", |c| c.health.as_mut()).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::MissingCapability {
                capability: "health",
                ..
            }
        ));
    }

    #[test]
    fn broadcast_visits_every_match() {
        let mut node = node();
        let mut seen = Vec::new();
        let wired = broadcast(
            &mut node,
            |c| &mut c.open_window_buttons[..],
            |button| seen.push(button.window()),
        );
        assert_eq!(wired, 2);
        assert_eq!(seen, vec![WindowId::Shop, WindowId::Settings]);
    }
}
