//! # Widget Tree
//!
//! The live visual tree. Every widget is mounted in exactly one node of a
//! [WidgetTree]; the tree owns the hierarchy (parent, ordered children) and
//! the generic per-node properties every native control has (text, bounds,
//! dock edge, visibility, enabled flag).
//!
//! ## Structural notifications
//!
//! Attaching and detaching children notifies the parent's widget through
//! [Widget::child_attached] and [Widget::child_removed]. Notifications are
//! delivered synchronously, in operation order, and always *after* the tree
//! has released its internal borrow, so a handler may freely call back into
//! the tree (and a widget may receive notifications caused by its own
//! operations while one of its own handlers is still running).
//!
//! ## Parent constraints
//!
//! A node may restrict which parents it accepts with a [ParentConstraint].
//! Attaching it anywhere else is silently reverted: the node stays where it
//! was and no notification fires.
//!
//! ```rust
//! use panekit_core::id::WidgetId;
//! use panekit_core::tree::WidgetTree;
//! use panekit_core::widget::Widget;
//!
//! struct Plain;
//!
//! impl Widget for Plain {
//!     fn widget_id(&self) -> WidgetId {
//!         WidgetId::new("docs", "Plain")
//!     }
//! }
//!
//! let tree = WidgetTree::new();
//! let (root, _) = tree.insert(|_| Plain);
//! let (child, _) = tree.insert(|_| Plain);
//!
//! tree.attach(root, child).unwrap();
//! assert_eq!(tree.parent(child), Some(root));
//! assert_eq!(tree.children(root), vec![child]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use crate::error::TreeError;
use crate::id::WidgetId;
use crate::layout::{Bounds, Dock};
use crate::update::Update;
use crate::widget::{downcast_widget, ClickEvent, SharedWidget, Widget};

/// Handle to a node in a [WidgetTree].
///
/// Ids are generational: once a node is destroyed its id never resolves again,
/// even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The slot index of this node.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of the slot this id was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Which parents a node accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentConstraint {
    /// Any parent.
    #[default]
    Any,
    /// Only parents whose widget has this id.
    Kind(WidgetId),
    /// Only this exact node.
    Node(NodeId),
}

impl ParentConstraint {
    fn allows(&self, parent: NodeId, parent_kind: &WidgetId) -> bool {
        match self {
            ParentConstraint::Any => true,
            ParentConstraint::Kind(kind) => kind == parent_kind,
            ParentConstraint::Node(node) => *node == parent,
        }
    }
}

struct Node {
    widget: SharedWidget,
    kind: WidgetId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    bounds: Bounds,
    dock: Dock,
    visible: bool,
    enabled: bool,
    constraint: ParentConstraint,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Arena {
    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn reserve(&mut self) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: None,
            });
            NodeId { index, generation: 0 }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        node
    }

    /// Unattached nodes restricted to one of `owners`.
    fn owned_by(&self, owners: &[NodeId]) -> Vec<NodeId> {
        if owners.is_empty() {
            return Vec::new();
        }
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let node = slot.node.as_ref()?;
                match node.constraint {
                    ParentConstraint::Node(owner) if node.parent.is_none() && owners.contains(&owner) => {
                        Some(NodeId {
                            index: index as u32,
                            generation: slot.generation,
                        })
                    },
                    _ => None,
                }
            })
            .collect()
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = self.get(of).and_then(|node| node.parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.get(id).and_then(|node| node.parent);
        }
        false
    }
}

/// The live visual tree.
///
/// All methods take `&self`; the tree is meant to be owned by the host
/// window and lent to widgets in every notification.
#[derive(Default)]
pub struct WidgetTree {
    arena: RefCell<Arena>,
    update: Cell<Update>,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a new widget in a fresh, unattached node.
    ///
    /// The builder receives the id of the node the widget will live in.
    pub fn insert<W: Widget>(&self, build: impl FnOnce(NodeId) -> W) -> (NodeId, Rc<W>) {
        let id = self.arena.borrow_mut().reserve();
        let widget = Rc::new(build(id));
        self.fill(id, widget.clone());
        (id, widget)
    }

    /// Like [insert](Self::insert), but the builder also receives a weak handle to the widget
    /// being built, for widgets that hand out callbacks pointing back at themselves.
    pub fn insert_cyclic<W: Widget>(&self, build: impl FnOnce(NodeId, &Weak<W>) -> W) -> (NodeId, Rc<W>) {
        let id = self.arena.borrow_mut().reserve();
        let widget = Rc::new_cyclic(|weak| build(id, weak));
        self.fill(id, widget.clone());
        (id, widget)
    }

    fn fill(&self, id: NodeId, widget: SharedWidget) {
        let kind = widget.widget_id();
        let mut arena = self.arena.borrow_mut();
        if let Some(slot) = arena.slots.get_mut(id.index as usize) {
            slot.node = Some(Node {
                widget,
                kind,
                parent: None,
                children: Vec::new(),
                text: String::new(),
                bounds: Bounds::default(),
                dock: Dock::None,
                visible: true,
                enabled: true,
                constraint: ParentConstraint::Any,
            });
        }
    }

    /// Returns if the node is alive.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.borrow().get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        let arena = self.arena.borrow();
        arena.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Returns if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The widget mounted in the node.
    pub fn widget(&self, id: NodeId) -> Option<SharedWidget> {
        self.arena.borrow().get(id).map(|node| node.widget.clone())
    }

    /// The widget mounted in the node, if it is a `W`.
    pub fn widget_as<W: Widget>(&self, id: NodeId) -> Option<Rc<W>> {
        self.widget(id).and_then(downcast_widget::<W>)
    }

    /// The widget id of the node's widget.
    pub fn kind(&self, id: NodeId) -> Option<WidgetId> {
        self.arena.borrow().get(id).map(|node| node.kind.clone())
    }

    /// The parent of the node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(id).and_then(|node| node.parent)
    }

    /// The children of the node, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena
            .borrow()
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// If `child` currently has another parent it is detached from it first.
    /// Attaching to the current parent does nothing. If the child's
    /// [ParentConstraint] rejects `parent`, the attach is reverted silently.
    pub fn attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let previous = {
            let arena = self.arena.borrow();
            let parent_node = arena.get(parent).ok_or(TreeError::NodeNotFound(parent))?;
            let child_node = arena.get(child).ok_or(TreeError::NodeNotFound(child))?;

            if parent == child || arena.is_ancestor(child, parent) {
                return Err(TreeError::Cycle { parent, child });
            }

            if !child_node.constraint.allows(parent, &parent_node.kind) {
                log::debug!(
                    "Reverted attaching {} ({}) to {} ({}): rejected by {:?}",
                    child,
                    child_node.kind,
                    parent,
                    parent_node.kind,
                    child_node.constraint
                );
                return Ok(());
            }

            if child_node.parent == Some(parent) {
                return Ok(());
            }

            child_node.parent
        };

        if let Some(previous) = previous {
            self.detach(previous, child)?;
            // The old parent may have reacted by moving the child somewhere else.
            if self.parent(child).is_some() {
                return Ok(());
            }
        }

        let widget = {
            let mut arena = self.arena.borrow_mut();
            let parent_node = arena.get_mut(parent).ok_or(TreeError::NodeNotFound(parent))?;
            parent_node.children.push(child);
            let widget = parent_node.widget.clone();
            if let Some(node) = arena.get_mut(child) {
                node.parent = Some(parent);
            }
            widget
        };

        self.request_update(Update::LAYOUT | Update::DRAW);
        widget.child_attached(self, child);
        Ok(())
    }

    /// Detach `child` from `parent`. Does nothing if it is not a child of `parent`.
    pub fn detach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let widget = {
            let mut arena = self.arena.borrow_mut();
            if arena.get(child).is_none() {
                return Err(TreeError::NodeNotFound(child));
            }
            let parent_node = arena.get_mut(parent).ok_or(TreeError::NodeNotFound(parent))?;
            let Some(position) = parent_node.children.iter().position(|id| *id == child) else {
                return Ok(());
            };
            parent_node.children.remove(position);
            let widget = parent_node.widget.clone();
            if let Some(node) = arena.get_mut(child) {
                node.parent = None;
            }
            widget
        };

        self.request_update(Update::LAYOUT | Update::DRAW);
        widget.child_removed(self, child);
        Ok(())
    }

    /// Destroy the node and its whole subtree.
    ///
    /// The node is detached from its parent first (with a notification); the
    /// subtree is then freed without further notifications. Unattached nodes
    /// restricted to a freed node ([ParentConstraint::Node]) are owned by it
    /// and are freed along with their own subtrees. If the node was
    /// unattached but restricted to a single owner node, the owner is told
    /// through [Widget::owned_destroyed].
    pub fn destroy(&self, id: NodeId) -> Result<(), TreeError> {
        let attached = match self.parent(id) {
            Some(parent) => {
                self.detach(parent, id)?;
                true
            },
            None => false,
        };

        let owner = {
            let arena = self.arena.borrow();
            let node = arena.get(id).ok_or(TreeError::NodeNotFound(id))?;
            match &node.constraint {
                ParentConstraint::Node(owner) if !attached => arena.get(*owner).map(|owner| owner.widget.clone()),
                _ => None,
            }
        };

        // Widgets are dropped after the borrow ends; their destructors may touch the tree.
        let mut released = Vec::new();
        {
            let mut arena = self.arena.borrow_mut();
            let mut pending = vec![id];
            loop {
                let mut freed = Vec::new();
                while let Some(current) = pending.pop() {
                    if let Some(node) = arena.release(current) {
                        pending.extend(node.children.iter().copied());
                        released.push(node.widget);
                        freed.push(current);
                    }
                }
                // Unattached nodes bound to a freed node go with their owner.
                pending = arena.owned_by(&freed);
                if pending.is_empty() {
                    break;
                }
            }
        }
        log::trace!("Destroyed {} ({} nodes)", id, released.len());
        drop(released);

        self.request_update(Update::LAYOUT | Update::DRAW);
        if let Some(owner) = owner {
            owner.owned_destroyed(self, id);
        }
        Ok(())
    }

    /// The node's text (label, caption, display name).
    pub fn text(&self, id: NodeId) -> Option<String> {
        self.arena.borrow().get(id).map(|node| node.text.clone())
    }

    /// Set the node's text.
    pub fn set_text(&self, id: NodeId, text: impl Into<String>) {
        let text = text.into();
        let changed = match self.arena.borrow_mut().get_mut(id) {
            Some(node) if node.text != text => {
                node.text = text;
                true
            },
            _ => false,
        };
        if changed {
            self.request_update(Update::DRAW);
        }
    }

    /// The node's bounds.
    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.arena.borrow().get(id).map(|node| node.bounds)
    }

    /// Set the node's bounds, notifying its widget through [Widget::resized] if the size changed.
    pub fn set_bounds(&self, id: NodeId, bounds: Bounds) {
        let resized = {
            let mut arena = self.arena.borrow_mut();
            match arena.get_mut(id) {
                Some(node) if node.bounds != bounds => {
                    let resized = node.bounds.size != bounds.size;
                    node.bounds = bounds;
                    resized.then(|| node.widget.clone())
                },
                _ => None,
            }
        };
        if let Some(widget) = resized {
            self.request_update(Update::LAYOUT | Update::DRAW);
            widget.resized(self);
        }
    }

    /// The dock edge of the node.
    pub fn dock(&self, id: NodeId) -> Dock {
        self.arena.borrow().get(id).map(|node| node.dock).unwrap_or_default()
    }

    /// Set the dock edge of the node.
    pub fn set_dock(&self, id: NodeId, dock: Dock) {
        if let Some(node) = self.arena.borrow_mut().get_mut(id) {
            node.dock = dock;
        }
    }

    /// Returns if the node is visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.arena.borrow().get(id).is_some_and(|node| node.visible)
    }

    /// Show or hide the node.
    pub fn set_visible(&self, id: NodeId, visible: bool) {
        let changed = match self.arena.borrow_mut().get_mut(id) {
            Some(node) if node.visible != visible => {
                node.visible = visible;
                true
            },
            _ => false,
        };
        if changed {
            self.request_update(Update::LAYOUT | Update::DRAW);
        }
    }

    /// Returns if the node accepts input.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.arena.borrow().get(id).is_some_and(|node| node.enabled)
    }

    /// Enable or disable input on the node.
    pub fn set_enabled(&self, id: NodeId, enabled: bool) {
        let changed = match self.arena.borrow_mut().get_mut(id) {
            Some(node) if node.enabled != enabled => {
                node.enabled = enabled;
                true
            },
            _ => false,
        };
        if changed {
            self.request_update(Update::DRAW);
        }
    }

    /// The parent constraint of the node.
    pub fn parent_constraint(&self, id: NodeId) -> Option<ParentConstraint> {
        self.arena.borrow().get(id).map(|node| node.constraint.clone())
    }

    /// Restrict which parents the node accepts. Does not move the node.
    pub fn set_parent_constraint(&self, id: NodeId, constraint: ParentConstraint) {
        if let Some(node) = self.arena.borrow_mut().get_mut(id) {
            node.constraint = constraint;
        }
    }

    /// Deliver a click to the node's widget if the node is enabled and visible.
    pub fn click(&self, id: NodeId, event: &ClickEvent) {
        let widget = {
            let arena = self.arena.borrow();
            match arena.get(id) {
                Some(node) if node.enabled && node.visible => node.widget.clone(),
                _ => return,
            }
        };
        widget.click(self, event);
    }

    /// Request an update of the host.
    pub fn request_update(&self, update: Update) {
        self.update.set(self.update.get() | update);
    }

    /// Take the accumulated update requests, leaving none pending.
    pub fn take_update(&self) -> Update {
        self.update.replace(Update::empty())
    }
}
