// SPDX-License-Identifier: LGPL-3.0-only
use panekit_core::id::WidgetId;
use panekit_core::layout::{dock_layout, Dock};
use panekit_core::tree::{NodeId, ParentConstraint, WidgetTree};
use panekit_core::widget::Widget;
use std::rc::Rc;

use crate::tab_manager::TabManager;

/// A content container shown as one tab of a [TabManager].
///
/// A fresh pane only accepts a tab manager as parent. Once a manager registers
/// it, the pane is bound to that manager alone until it is removed again. Any
/// other reparenting attempt is reverted by the tree.
pub struct TabPane {
    node: NodeId,
}

impl TabPane {
    /// Mount a new pane with the given display name.
    pub fn new(tree: &WidgetTree, name: impl Into<String>) -> Rc<Self> {
        let (node, pane) = tree.insert(|node| Self { node });
        tree.set_text(node, name);
        tree.set_dock(node, Dock::Fill);
        tree.set_parent_constraint(node, ParentConstraint::Kind(TabManager::kind()));
        pane
    }

    /// The node this pane lives in.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The display name, shown on the pane's selector.
    pub fn name(&self, tree: &WidgetTree) -> String {
        tree.text(self.node).unwrap_or_default()
    }

    /// Change the display name. The selector label follows on the manager's next layout pass.
    pub fn set_name(&self, tree: &WidgetTree, name: impl Into<String>) {
        tree.set_text(self.node, name);
    }

    /// The manager this pane is registered with, if any.
    pub fn owner(&self, tree: &WidgetTree) -> Option<NodeId> {
        match tree.parent_constraint(self.node) {
            Some(ParentConstraint::Node(owner)) => Some(owner),
            _ => None,
        }
    }
}

impl Widget for TabPane {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("panekit-widgets", "TabPane")
    }

    fn resized(&self, tree: &WidgetTree) {
        dock_layout(tree, self.node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;

    #[test]
    fn test_fresh_pane_rejects_plain_containers() {
        let tree = WidgetTree::new();
        let pane = TabPane::new(&tree, "Orphan");
        let panel = Panel::new(&tree);

        tree.attach(panel.node(), pane.node()).unwrap();

        assert_eq!(tree.parent(pane.node()), None);
        assert!(tree.children(panel.node()).is_empty());
        assert_eq!(pane.owner(&tree), None);
    }

    #[test]
    fn test_name_round_trips_through_the_node() {
        let tree = WidgetTree::new();
        let pane = TabPane::new(&tree, "Before");
        pane.set_name(&tree, "After");
        assert_eq!(pane.name(&tree), "After");
        assert_eq!(tree.dock(pane.node()), Dock::Fill);
    }
}
