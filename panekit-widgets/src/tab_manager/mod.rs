// SPDX-License-Identifier: LGPL-3.0-only
use panekit_core::config::{TabAlignment, TabsConfig};
use panekit_core::id::WidgetId;
use panekit_core::layout::{dock_layout, Bounds, Dock};
use panekit_core::tree::{NodeId, ParentConstraint, WidgetTree};
use panekit_core::widget::Widget;
use peniko::Color;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use crate::error::TabsError;
use crate::panel::Panel;
use crate::selector::SelectorButton;
use crate::separator::Separator;
use crate::tab_pane::TabPane;

/// Tells the manager's own structural changes apart from consumer-driven ones.
pub mod interceptor;

use interceptor::{Interceptor, Suppression};

/// Stable identity of a registered tab.
///
/// Keys are issued from a counter and never reused or renumbered. Every
/// selector carries the key of its pane as opaque reference; the key is
/// resolved to a list position only when the selector is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabKey(u64);

impl TabKey {
    /// The raw key value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for TabKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab {}", self.0)
    }
}

#[derive(Clone)]
struct Tab {
    key: TabKey,
    pane: NodeId,
    selector: Rc<SelectorButton>,
}

#[derive(Default)]
struct TabState {
    tabs: Vec<Tab>,
    mounted: Option<TabKey>,
    next_key: u64,
}

impl TabState {
    fn position_of_key(&self, key: TabKey) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.key == key)
    }

    fn position_of_pane(&self, pane: NodeId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.pane == pane)
    }

    fn issue_key(&mut self) -> TabKey {
        let key = TabKey(self.next_key);
        self.next_key += 1;
        key
    }
}

/// A container showing one of several [TabPane]s at a time, with a strip of
/// [SelectorButton]s to switch between them.
///
/// Tabs are added by attaching a pane to the manager's node, either directly
/// through the tree or with [add_tab](TabManager::add_tab). The manager takes
/// the pane out of the tree again, registers it, and creates a selector for
/// it. Only the mounted pane is ever a child of the manager node; switching
/// tabs detaches the old pane and attaches the new one.
///
/// The manager node always holds the selector strip and the separator line in
/// front of the mounted pane. Both are docked to the edge given by the
/// configured [TabAlignment] and the mounted pane fills the rest.
///
/// ### Theming
/// The strip and separator are styled through [TabsConfig] and the setters
/// below. Panes draw their own content.
pub struct TabManager {
    node: NodeId,
    this: Weak<TabManager>,
    strip: Rc<Panel>,
    separator: Rc<Separator>,
    state: RefCell<TabState>,
    interceptor: Interceptor,
    config: RefCell<TabsConfig>,
}

impl TabManager {
    /// Mount a new, empty tab manager with the default configuration.
    pub fn new(tree: &WidgetTree) -> Result<Rc<Self>, TabsError> {
        Self::with_config(tree, TabsConfig::default())
    }

    /// Mount a new, empty tab manager.
    pub fn with_config(tree: &WidgetTree, config: TabsConfig) -> Result<Rc<Self>, TabsError> {
        let strip = Panel::new(tree);
        let separator = Separator::new(tree);
        separator.set_spacing(tree, 0.0);

        let (node, manager) = tree.insert_cyclic(|node, this| Self {
            node,
            this: this.clone(),
            strip,
            separator,
            state: RefCell::new(TabState::default()),
            interceptor: Interceptor::new(),
            config: RefCell::new(config),
        });

        tree.attach(node, manager.strip.node())?;
        tree.attach(node, manager.separator.node())?;
        tree.set_parent_constraint(manager.strip.node(), ParentConstraint::Node(node));
        tree.set_parent_constraint(manager.separator.node(), ParentConstraint::Node(node));

        manager.layout(tree);
        Ok(manager)
    }

    /// The widget id every tab manager reports.
    pub fn kind() -> WidgetId {
        WidgetId::new("panekit-widgets", "TabManager")
    }

    /// The node this manager lives in.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The panel holding the selectors.
    pub fn strip(&self) -> &Rc<Panel> {
        &self.strip
    }

    /// The line between the selector strip and the mounted pane.
    pub fn separator(&self) -> &Rc<Separator> {
        &self.separator
    }

    /// Add a tab by attaching the pane to this manager.
    ///
    /// Adding a pane that is already registered selects it instead.
    pub fn add_tab(&self, tree: &WidgetTree, pane: &TabPane) -> Result<(), TabsError> {
        tree.attach(self.node, pane.node())?;
        if self.key_of(pane.node()).is_some() {
            return Ok(());
        }
        // The tree reverted the attach.
        match pane.owner(tree) {
            Some(owner) if owner != self.node => Err(TabsError::OwnedElsewhere(pane.node())),
            _ => Err(TabsError::TabNotFound(pane.node())),
        }
    }

    /// Remove a tab and destroy its selector. The pane itself stays alive, unattached.
    pub fn remove_tab(&self, tree: &WidgetTree, pane: &TabPane) -> Result<(), TabsError> {
        let key = self.key_of(pane.node()).ok_or(TabsError::TabNotFound(pane.node()))?;

        if self.state.borrow().mounted == Some(key) {
            tree.detach(self.node, pane.node())?;
            Ok(())
        } else {
            self.unregister(tree, pane.node())
        }
    }

    /// Activate the selector at `index`, mounting its pane.
    pub fn select(&self, tree: &WidgetTree, index: usize) -> Result<(), TabsError> {
        let selector = {
            let state = self.state.borrow();
            let len = state.tabs.len();
            state
                .tabs
                .get(index)
                .map(|tab| tab.selector.clone())
                .ok_or(TabsError::IndexOutOfRange { index, len })?
        };
        selector.activate(tree, None);
        Ok(())
    }

    /// Number of registered tabs.
    pub fn len(&self) -> usize {
        self.state.borrow().tabs.len()
    }

    /// Returns if no tab is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The registered panes, in display order.
    pub fn panes(&self) -> Vec<NodeId> {
        self.state.borrow().tabs.iter().map(|tab| tab.pane).collect()
    }

    /// The selectors currently in the strip, in display order.
    pub fn selectors(&self, tree: &WidgetTree) -> Vec<Rc<SelectorButton>> {
        tree.children(self.strip.node())
            .into_iter()
            .filter_map(|node| tree.widget_as::<SelectorButton>(node))
            .collect()
    }

    /// The key of a registered pane.
    pub fn key_of(&self, pane: NodeId) -> Option<TabKey> {
        let state = self.state.borrow();
        state.position_of_pane(pane).map(|index| state.tabs[index].key)
    }

    /// The current position of a tab.
    pub fn index_of(&self, key: TabKey) -> Option<usize> {
        self.state.borrow().position_of_key(key)
    }

    /// The mounted pane.
    pub fn mounted(&self) -> Option<NodeId> {
        let state = self.state.borrow();
        let index = state.mounted.and_then(|key| state.position_of_key(key))?;
        Some(state.tabs[index].pane)
    }

    /// The position of the mounted pane.
    pub fn mounted_index(&self) -> Option<usize> {
        let state = self.state.borrow();
        state.mounted.and_then(|key| state.position_of_key(key))
    }

    /// The position of the first active selector.
    pub fn active_index(&self) -> Option<usize> {
        self.state.borrow().tabs.iter().position(|tab| tab.selector.is_active())
    }

    /// The interceptor's current tag.
    pub fn suppression(&self) -> Suppression {
        self.interceptor.state()
    }

    /// How many of its own structural notifications the manager has ignored so far.
    pub fn suppressed_notifications(&self) -> usize {
        self.interceptor.suppressed()
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> TabsConfig {
        self.config.borrow().clone()
    }

    /// Replace the whole configuration.
    pub fn apply_config(&self, tree: &WidgetTree, config: TabsConfig) {
        *self.config.borrow_mut() = config;
        self.layout(tree);
    }

    /// Set the edge the selector strip is docked to.
    pub fn set_alignment(&self, tree: &WidgetTree, alignment: TabAlignment) {
        self.config.borrow_mut().alignment = alignment;
        self.layout(tree);
    }

    /// Set the height (top/bottom) or width (left/right) of the selector strip.
    pub fn set_strip_size(&self, tree: &WidgetTree, strip_size: f32) {
        self.config.borrow_mut().strip_size = strip_size.max(0.0);
        self.layout(tree);
    }

    /// Set the colour of the separator line.
    pub fn set_separator_color(&self, tree: &WidgetTree, color: Color) {
        self.config.borrow_mut().separator_color = color;
        self.layout(tree);
    }

    /// Show or hide the separator line.
    pub fn set_separator_visible(&self, tree: &WidgetTree, visible: bool) {
        self.config.borrow_mut().show_separator = visible;
        self.layout(tree);
    }

    /// Show or hide the border of every selector.
    pub fn set_selector_border_visible(&self, tree: &WidgetTree, visible: bool) {
        self.config.borrow_mut().show_selector_border = visible;
        self.layout(tree);
    }

    /// Verify that panes, selectors and the mounted pane agree.
    ///
    /// Checks that there is one selector per pane, that the selector at every
    /// position carries the key of the pane at the same position, that only the
    /// mounted pane is attached to the manager, and that the mounted pane's
    /// selector is the only active one.
    pub fn check_invariants(&self, tree: &WidgetTree) -> Result<(), TabsError> {
        let selectors = self.selectors(tree);
        let state = self.state.borrow();

        if selectors.len() != state.tabs.len() {
            return Err(TabsError::LengthMismatch {
                panes: state.tabs.len(),
                selectors: selectors.len(),
            });
        }

        for (index, (selector, tab)) in selectors.iter().zip(&state.tabs).enumerate() {
            let resolved = selector
                .reference_as::<TabKey>()
                .and_then(|key| state.position_of_key(*key));
            if resolved != Some(index) || !Rc::ptr_eq(selector, &tab.selector) {
                return Err(TabsError::ReferenceMismatch { index, pane: tab.pane });
            }
        }

        let mounted = state.mounted.and_then(|key| state.position_of_key(key));
        let attached: Vec<usize> = state
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, tab)| tree.parent(tab.pane) == Some(self.node))
            .map(|(index, _)| index)
            .collect();
        let active: Vec<usize> = selectors
            .iter()
            .enumerate()
            .filter(|(_, selector)| selector.is_active())
            .map(|(index, _)| index)
            .collect();

        let expected: Vec<usize> = mounted.into_iter().collect();
        if attached != expected || active != expected {
            return Err(TabsError::SelectionMismatch { active, mounted });
        }

        Ok(())
    }

    fn register(&self, tree: &WidgetTree, pane: NodeId) -> Result<(), TabsError> {
        let key = self.state.borrow_mut().issue_key();
        let name = tree.text(pane).unwrap_or_default();

        let selector = SelectorButton::with_reference(tree, name.clone(), key);
        selector.set_auto_search(true);
        selector.set_show_border(tree, self.config.borrow().show_selector_border);

        let this = self.this.clone();
        selector.on_activate(move |tree, _, _, reference| {
            let Some(manager) = this.upgrade() else {
                return;
            };
            match reference.and_then(|reference| reference.downcast_ref::<TabKey>()) {
                Some(key) => manager.switch_to(tree, *key),
                None => log::trace!("Selector activation without tab key ignored"),
            }
        });

        tree.set_parent_constraint(pane, ParentConstraint::Node(self.node));
        tree.attach(self.strip.node(), selector.node())?;

        let first = {
            let mut state = self.state.borrow_mut();
            state.tabs.push(Tab {
                key,
                pane,
                selector: selector.clone(),
            });
            state.tabs.len() == 1
        };

        log::debug!("Registered pane {} ({:?}) as {}", pane, name, key);

        if first {
            selector.activate(tree, None);
        }

        self.layout(tree);
        Ok(())
    }

    fn unregister(&self, tree: &WidgetTree, pane: NodeId) -> Result<(), TabsError> {
        let strip_children = tree.children(self.strip.node());

        let (index, tab, was_mounted) = {
            let mut state = self.state.borrow_mut();
            let index = state.position_of_pane(pane).ok_or(TabsError::TabNotFound(pane))?;

            if strip_children.len() != state.tabs.len() {
                return Err(TabsError::LengthMismatch {
                    panes: state.tabs.len(),
                    selectors: strip_children.len(),
                });
            }
            if strip_children[index] != state.tabs[index].selector.node() {
                return Err(TabsError::ReferenceMismatch { index, pane });
            }

            let tab = state.tabs.remove(index);
            let was_mounted = state.mounted == Some(tab.key);
            if was_mounted {
                state.mounted = None;
            }
            (index, tab, was_mounted)
        };

        tree.destroy(tab.selector.node())?;
        tree.set_parent_constraint(pane, ParentConstraint::Kind(Self::kind()));

        log::debug!("Unregistered pane {} ({})", pane, tab.key);

        if was_mounted && self.config.borrow().reselect_on_remove {
            let neighbour = {
                let state = self.state.borrow();
                state
                    .tabs
                    .get(index)
                    .or_else(|| state.tabs.last())
                    .map(|tab| tab.selector.clone())
            };
            if let Some(selector) = neighbour {
                selector.activate(tree, None);
            }
        }

        self.layout(tree);
        Ok(())
    }

    /// Mount the pane of `key` in place of the currently mounted one.
    fn switch_to(&self, tree: &WidgetTree, key: TabKey) {
        let (pane, previous) = {
            let state = self.state.borrow();
            let Some(index) = state.position_of_key(key) else {
                log::trace!("Ignoring activation of stale {}", key);
                return;
            };
            let previous = state
                .mounted
                .and_then(|mounted| state.position_of_key(mounted))
                .map(|index| state.tabs[index].pane);
            (state.tabs[index].pane, previous)
        };

        if previous == Some(pane) {
            return;
        }

        if let Some(previous) = previous {
            let _armed = self.interceptor.arm_detach();
            if let Err(e) = tree.detach(self.node, previous) {
                log::error!("Failed to unmount pane {}: {}", previous, e);
            }
        }

        self.state.borrow_mut().mounted = Some(key);
        tree.set_dock(pane, Dock::Fill);

        {
            let _armed = self.interceptor.arm_attach();
            if let Err(e) = tree.attach(self.node, pane) {
                log::error!("Failed to mount pane {}: {}", pane, e);
            }
        }

        log::debug!("Mounted pane {} ({}) in {}", pane, key, self.node);
        self.layout(tree);
    }

    fn is_chrome(&self, node: NodeId) -> bool {
        node == self.strip.node() || node == self.separator.node()
    }

    /// A consumer attached `child` to the manager node.
    fn adopt(&self, tree: &WidgetTree, child: NodeId) {
        {
            let _armed = self.interceptor.arm_detach();
            if let Err(e) = tree.detach(self.node, child) {
                log::error!("Failed to take {} out of {}: {}", child, self.node, e);
                return;
            }
        }

        if tree.widget_as::<TabPane>(child).is_none() {
            log::warn!(
                "Tab manager {} only hosts tab panes, detached {} ({:?})",
                self.node,
                child,
                tree.kind(child)
            );
            return;
        }

        if let Some(index) = self.key_of(child).and_then(|key| self.index_of(key)) {
            log::debug!("Pane {} re-attached, selecting tab {}", child, index);
            if let Err(e) = self.select(tree, index) {
                self.violated(e);
            }
            return;
        }

        if let Err(e) = self.register(tree, child) {
            self.violated(e);
        }
    }

    fn violated(&self, error: TabsError) -> ! {
        log::error!("Tab manager {} is inconsistent: {}", self.node, error);
        panic!("tab manager {} is inconsistent: {}", self.node, error);
    }

    /// Dock the strip, separator and mounted pane, and lay out the selectors.
    fn layout(&self, tree: &WidgetTree) {
        let config = self.config.borrow().clone();
        let tabs = self.state.borrow().tabs.clone();
        let alignment = config.alignment;
        let horizontal = alignment.is_horizontal();
        let outer = tree.bounds(self.node).unwrap_or_default();

        for tab in &tabs {
            let selector = &tab.selector;
            if let Some(name) = tree.text(tab.pane) {
                selector.set_label(tree, name);
            }
            selector.set_show_border(tree, config.show_selector_border);
            tree.set_dock(selector.node(), alignment.selector_dock());

            let current = tree.bounds(selector.node()).unwrap_or_default();
            let (width, height) = if horizontal {
                (selector.preferred_width(tree), config.strip_size)
            } else {
                (config.strip_size, config.strip_size)
            };
            tree.set_bounds(
                selector.node(),
                Bounds::new(current.location.x, current.location.y, width, height),
            );
        }

        let separator = &self.separator;
        separator.set_orientation(tree, alignment.orientation());
        separator.set_color(tree, config.separator_color);
        tree.set_visible(separator.node(), config.show_separator);

        let (strip_size, separator_size) = if horizontal {
            (
                Bounds::new(outer.location.x, outer.location.y, outer.size.x, config.strip_size),
                Bounds::new(outer.location.x, outer.location.y, outer.size.x, separator.min_extent()),
            )
        } else {
            (
                Bounds::new(outer.location.x, outer.location.y, config.strip_size, outer.size.y),
                Bounds::new(outer.location.x, outer.location.y, separator.min_extent(), outer.size.y),
            )
        };

        tree.set_dock(self.strip.node(), alignment.dock());
        tree.set_dock(separator.node(), alignment.dock());
        tree.set_bounds(self.strip.node(), strip_size);
        tree.set_bounds(separator.node(), separator_size);

        dock_layout(tree, self.node);
        dock_layout(tree, self.strip.node());

        log::trace!("Laid out tab manager {} ({} tabs, {:?})", self.node, tabs.len(), alignment);
    }
}

impl Widget for TabManager {
    fn widget_id(&self) -> WidgetId {
        Self::kind()
    }

    fn child_attached(&self, tree: &WidgetTree, child: NodeId) {
        if self.is_chrome(child) {
            return;
        }
        if self.interceptor.consume_attach() {
            log::trace!("Suppressed attach notification for {}", child);
            return;
        }
        self.adopt(tree, child);
    }

    fn child_removed(&self, tree: &WidgetTree, child: NodeId) {
        if self.is_chrome(child) {
            log::warn!("Tab manager {} lost its own child {}", self.node, child);
            return;
        }
        if self.interceptor.consume_detach() {
            log::trace!("Suppressed detach notification for {}", child);
            return;
        }
        if self.key_of(child).is_none() {
            return;
        }
        if let Err(e) = self.unregister(tree, child) {
            self.violated(e);
        }
    }

    fn resized(&self, tree: &WidgetTree) {
        self.layout(tree);
    }

    fn owned_destroyed(&self, tree: &WidgetTree, node: NodeId) {
        if self.key_of(node).is_none() {
            return;
        }
        log::debug!("Registered pane {} was destroyed", node);
        if let Err(e) = self.unregister(tree, node) {
            self.violated(e);
        }
    }
}
