// SPDX-License-Identifier: LGPL-3.0-only
use panekit_core::id::WidgetId;
use panekit_core::layout::dock_layout;
use panekit_core::tree::{NodeId, WidgetTree};
use panekit_core::widget::Widget;
use std::rc::Rc;

/// A plain container. Lays its children out by dock edge whenever it is resized.
///
/// ### Theming
/// The panel doesn't draw anything but its children, so theming is useless.
pub struct Panel {
    node: NodeId,
}

impl Panel {
    /// Mount a new, empty panel in the tree.
    pub fn new(tree: &WidgetTree) -> Rc<Self> {
        tree.insert(|node| Self { node }).1
    }

    /// The node this panel lives in.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Widget for Panel {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("panekit-widgets", "Panel")
    }

    fn resized(&self, tree: &WidgetTree) {
        dock_layout(tree, self.node);
    }
}
