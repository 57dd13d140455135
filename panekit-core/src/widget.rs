use std::any::Any;
use std::rc::Rc;

use nalgebra::Vector2;

use crate::id::WidgetId;
use crate::tree::{NodeId, WidgetTree};
use crate::window::MouseButton;

/// Upcasting helper so trait objects can be downcast back to their concrete widget.
///
/// Implemented for every `'static` type; there is no need to implement it by hand.
pub trait AsAny: Any {
    /// Borrow as [Any].
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared widget into a shared [Any].
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A pointer click delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// The button that was clicked.
    pub button: MouseButton,
    /// Cursor position in window coordinates.
    pub position: Vector2<f32>,
    /// Number of consecutive clicks.
    pub clicks: u32,
}

impl ClickEvent {
    /// A single primary click at the given position.
    pub fn primary(position: Vector2<f32>) -> Self {
        Self {
            button: MouseButton::Left,
            position,
            clicks: 1,
        }
    }

    /// Returns if this click was made with the primary button.
    pub fn is_primary(&self) -> bool {
        self.button == MouseButton::Left
    }
}

/// The base trait for all widgets mounted in a [WidgetTree].
///
/// Widgets are shared (`Rc`) and use interior mutability, because the tree
/// notifies them synchronously while other widgets may still be running
/// their own handlers. A handler must never hold a `RefCell` borrow across a
/// call into the tree: the tree may call straight back into the same widget.
///
/// Every hook except [widget_id](Widget::widget_id) defaults to doing nothing.
pub trait Widget: AsAny {
    /// Return the widget id.
    fn widget_id(&self) -> WidgetId;

    /// The widget was clicked. Only delivered to enabled, visible nodes.
    fn click(&self, _tree: &WidgetTree, _event: &ClickEvent) {}

    /// `child` was attached to this widget's node.
    fn child_attached(&self, _tree: &WidgetTree, _child: NodeId) {}

    /// `child` was removed from this widget's node.
    fn child_removed(&self, _tree: &WidgetTree, _child: NodeId) {}

    /// The size of this widget's node changed.
    fn resized(&self, _tree: &WidgetTree) {}

    /// `node`, which named this widget as its only allowed parent, was destroyed
    /// while not attached to it.
    fn owned_destroyed(&self, _tree: &WidgetTree, _node: NodeId) {}
}

/// A shared widget.
pub type SharedWidget = Rc<dyn Widget>;

/// Downcast a shared widget to its concrete type.
pub fn downcast_widget<W: Widget>(widget: SharedWidget) -> Option<Rc<W>> {
    AsAny::into_any_rc(widget).downcast::<W>().ok()
}
