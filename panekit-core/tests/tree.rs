use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector2;
use panekit_core::error::TreeError;
use panekit_core::id::WidgetId;
use panekit_core::layout::{dock_layout, Bounds, Dock};
use panekit_core::tree::{NodeId, ParentConstraint, WidgetTree};
use panekit_core::update::Update;
use panekit_core::widget::{ClickEvent, Widget};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Attached(NodeId),
    Removed(NodeId),
    Resized,
    Clicked,
    OwnedDestroyed(NodeId),
}

type Journal = Rc<RefCell<Vec<(NodeId, Event)>>>;

struct Recorder {
    node: NodeId,
    journal: Journal,
}

impl Recorder {
    fn mount(tree: &WidgetTree, journal: &Journal) -> NodeId {
        let journal = journal.clone();
        tree.insert(|node| Recorder { node, journal }).0
    }

    fn log(&self, event: Event) {
        self.journal.borrow_mut().push((self.node, event));
    }
}

impl Widget for Recorder {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("tests", "Recorder")
    }

    fn click(&self, _tree: &WidgetTree, _event: &ClickEvent) {
        self.log(Event::Clicked);
    }

    fn child_attached(&self, _tree: &WidgetTree, child: NodeId) {
        self.log(Event::Attached(child));
    }

    fn child_removed(&self, _tree: &WidgetTree, child: NodeId) {
        self.log(Event::Removed(child));
    }

    fn resized(&self, _tree: &WidgetTree) {
        self.log(Event::Resized);
    }

    fn owned_destroyed(&self, _tree: &WidgetTree, node: NodeId) {
        self.log(Event::OwnedDestroyed(node));
    }
}

struct Plain;

impl Widget for Plain {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("tests", "Plain")
    }
}

/// Sends every attached child straight to another node.
struct Forwarder {
    target: NodeId,
}

impl Widget for Forwarder {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("tests", "Forwarder")
    }

    fn child_attached(&self, tree: &WidgetTree, child: NodeId) {
        tree.attach(self.target, child).unwrap();
    }
}

#[test]
fn test_notifications_follow_operation_order() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let first = Recorder::mount(&tree, &journal);
    let second = Recorder::mount(&tree, &journal);
    let child = Recorder::mount(&tree, &journal);

    tree.attach(first, child).unwrap();
    tree.attach(second, child).unwrap();
    tree.detach(second, child).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            (first, Event::Attached(child)),
            (first, Event::Removed(child)),
            (second, Event::Attached(child)),
            (second, Event::Removed(child)),
        ]
    );
    assert_eq!(tree.parent(child), None);
}

#[test]
fn test_repeated_attach_and_foreign_detach_are_silent() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let parent = Recorder::mount(&tree, &journal);
    let other = Recorder::mount(&tree, &journal);
    let child = Recorder::mount(&tree, &journal);

    tree.attach(parent, child).unwrap();
    tree.attach(parent, child).unwrap();
    tree.detach(other, child).unwrap();

    assert_eq!(*journal.borrow(), vec![(parent, Event::Attached(child))]);
    assert_eq!(tree.children(parent), vec![child]);
}

#[test]
fn test_handlers_may_reenter_the_tree() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let target = Recorder::mount(&tree, &journal);
    let (forwarder, _) = tree.insert(|_| Forwarder { target });
    let child = Recorder::mount(&tree, &journal);

    tree.attach(forwarder, child).unwrap();

    assert_eq!(tree.parent(child), Some(target));
    assert!(tree.children(forwarder).is_empty());
    assert_eq!(*journal.borrow(), vec![(target, Event::Attached(child))]);
}

#[test]
fn test_cycles_are_rejected() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let root = Recorder::mount(&tree, &journal);
    let leaf = Recorder::mount(&tree, &journal);
    tree.attach(root, leaf).unwrap();

    assert_eq!(tree.attach(leaf, root), Err(TreeError::Cycle { parent: leaf, child: root }));
    assert_eq!(tree.attach(root, root), Err(TreeError::Cycle { parent: root, child: root }));
    assert_eq!(tree.parent(root), None);
}

#[test]
fn test_parent_constraints_revert_silently() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let (panel, _) = tree.insert(|_| Plain);
    let owner = Recorder::mount(&tree, &journal);
    let child = Recorder::mount(&tree, &journal);

    tree.set_parent_constraint(child, ParentConstraint::Node(owner));
    tree.attach(panel, child).unwrap();
    assert_eq!(tree.parent(child), None);
    assert!(journal.borrow().is_empty());

    tree.set_parent_constraint(child, ParentConstraint::Kind(WidgetId::new("tests", "Recorder")));
    tree.attach(owner, child).unwrap();
    assert_eq!(tree.parent(child), Some(owner));

    // A rejected move keeps the node where it was.
    tree.attach(panel, child).unwrap();
    assert_eq!(tree.parent(child), Some(owner));
    assert_eq!(*journal.borrow(), vec![(owner, Event::Attached(child))]);
}

#[test]
fn test_destroy_frees_subtree_and_invalidates_ids() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let root = Recorder::mount(&tree, &journal);
    let middle = Recorder::mount(&tree, &journal);
    let leaf = Recorder::mount(&tree, &journal);
    tree.attach(root, middle).unwrap();
    tree.attach(middle, leaf).unwrap();
    journal.borrow_mut().clear();

    tree.destroy(middle).unwrap();

    assert_eq!(*journal.borrow(), vec![(root, Event::Removed(middle))]);
    assert!(!tree.contains(middle));
    assert!(!tree.contains(leaf));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.destroy(middle), Err(TreeError::NodeNotFound(middle)));

    // The freed slot is reused under a new generation.
    let reused = Recorder::mount(&tree, &journal);
    assert_ne!(reused, middle);
    assert!(tree.contains(reused));
    assert!(tree.text(middle).is_none());
}

#[test]
fn test_destroying_an_unattached_owned_node_tells_the_owner() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let owner = Recorder::mount(&tree, &journal);
    let owned = Recorder::mount(&tree, &journal);
    let attached = Recorder::mount(&tree, &journal);

    tree.set_parent_constraint(owned, ParentConstraint::Node(owner));
    tree.set_parent_constraint(attached, ParentConstraint::Node(owner));
    tree.attach(owner, attached).unwrap();
    journal.borrow_mut().clear();

    tree.destroy(owned).unwrap();
    tree.destroy(attached).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            (owner, Event::OwnedDestroyed(owned)),
            (owner, Event::Removed(attached)),
        ]
    );
}

#[test]
fn test_destroying_an_owner_frees_its_unattached_nodes() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let owner = Recorder::mount(&tree, &journal);
    let owned = Recorder::mount(&tree, &journal);
    let owned_child = Recorder::mount(&tree, &journal);
    let nested = Recorder::mount(&tree, &journal);
    let bystander = Recorder::mount(&tree, &journal);
    let foreign = Recorder::mount(&tree, &journal);

    tree.set_parent_constraint(owned, ParentConstraint::Node(owner));
    tree.attach(owned, owned_child).unwrap();
    // Owned by a node that only goes away in the cascade.
    tree.set_parent_constraint(nested, ParentConstraint::Node(owned_child));
    tree.set_parent_constraint(foreign, ParentConstraint::Node(bystander));
    journal.borrow_mut().clear();

    tree.destroy(owner).unwrap();

    assert!(!tree.contains(owner));
    assert!(!tree.contains(owned));
    assert!(!tree.contains(owned_child));
    assert!(!tree.contains(nested));
    assert!(tree.contains(bystander));
    assert!(tree.contains(foreign));
    assert_eq!(tree.len(), 2);
    assert!(journal.borrow().is_empty());
}

#[test]
fn test_clicks_need_enabled_visible_nodes() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let node = Recorder::mount(&tree, &journal);
    let event = ClickEvent::primary(Vector2::new(1.0, 1.0));

    tree.click(node, &event);
    tree.set_enabled(node, false);
    tree.click(node, &event);
    tree.set_enabled(node, true);
    tree.set_visible(node, false);
    tree.click(node, &event);

    assert_eq!(*journal.borrow(), vec![(node, Event::Clicked)]);
}

#[test]
fn test_update_requests_accumulate_until_taken() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let parent = Recorder::mount(&tree, &journal);
    let child = Recorder::mount(&tree, &journal);
    assert_eq!(tree.take_update(), Update::empty());

    tree.set_text(child, "label");
    assert_eq!(tree.take_update(), Update::DRAW);

    tree.set_text(child, "label");
    assert_eq!(tree.take_update(), Update::empty());

    tree.attach(parent, child).unwrap();
    assert_eq!(tree.take_update(), Update::LAYOUT | Update::DRAW);
}

#[test]
fn test_resize_only_on_size_change() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let node = Recorder::mount(&tree, &journal);

    tree.set_bounds(node, Bounds::new(0.0, 0.0, 10.0, 10.0));
    tree.set_bounds(node, Bounds::new(5.0, 5.0, 10.0, 10.0));
    tree.set_bounds(node, Bounds::new(5.0, 5.0, 20.0, 10.0));

    assert_eq!(*journal.borrow(), vec![(node, Event::Resized), (node, Event::Resized)]);
}

#[test]
fn test_dock_layout_places_edges_then_fill() {
    init();
    let tree = WidgetTree::new();
    let journal = Journal::default();
    let container = Recorder::mount(&tree, &journal);
    let top = Recorder::mount(&tree, &journal);
    let fill = Recorder::mount(&tree, &journal);
    let left = Recorder::mount(&tree, &journal);
    let hidden = Recorder::mount(&tree, &journal);

    for (child, dock, bounds) in [
        (top, Dock::Top, Bounds::new(0.0, 0.0, 0.0, 20.0)),
        (fill, Dock::Fill, Bounds::default()),
        (left, Dock::Left, Bounds::new(0.0, 0.0, 30.0, 0.0)),
        (hidden, Dock::Bottom, Bounds::new(0.0, 0.0, 0.0, 50.0)),
    ] {
        tree.set_dock(child, dock);
        tree.set_bounds(child, bounds);
        tree.attach(container, child).unwrap();
    }
    tree.set_visible(hidden, false);
    tree.set_bounds(container, Bounds::new(10.0, 10.0, 200.0, 100.0));

    dock_layout(&tree, container);

    assert_eq!(tree.bounds(top), Some(Bounds::new(10.0, 10.0, 200.0, 20.0)));
    assert_eq!(tree.bounds(left), Some(Bounds::new(10.0, 30.0, 30.0, 80.0)));
    assert_eq!(tree.bounds(fill), Some(Bounds::new(40.0, 30.0, 170.0, 80.0)));
    assert_eq!(tree.bounds(hidden), Some(Bounds::new(0.0, 0.0, 0.0, 50.0)));
}
