// SPDX-License-Identifier: LGPL-3.0-only
use panekit_core::id::WidgetId;
use panekit_core::tree::{NodeId, WidgetTree};
use panekit_core::update::Update;
use panekit_core::widget::{ClickEvent, Widget};
use peniko::Color;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const DEFAULT_FONT_SIZE: f32 = 12.0;
const CHAR_WIDTH_FACTOR: f32 = 0.6;
const LABEL_PADDING: f32 = 8.0;

/// Callback fired when a [SelectorButton] is activated.
///
/// Receives the tree, the button, the originating click (`None` for a
/// programmatic activation) and the button's opaque reference.
pub type ActivateHandler = Rc<dyn Fn(&WidgetTree, &SelectorButton, Option<&ClickEvent>, Option<&dyn Any>)>;

/// A clickable button with an active state, typically one of a strip of choices.
///
/// With `auto_search` enabled, activating the button first deactivates every
/// sibling (same parent node) that also has `auto_search` enabled, so at most
/// one of them is active after any click. Nothing else ever deactivates a
/// button: there is no user-triggered Active → Inactive transition.
pub struct SelectorButton {
    node: NodeId,
    reference: Option<Box<dyn Any>>,
    active: Cell<bool>,
    auto_search: Cell<bool>,
    show_border: Cell<bool>,
    selected_color: Cell<Color>,
    unselected_color: Cell<Color>,
    font_size: Cell<f32>,
    on_activate: RefCell<Option<ActivateHandler>>,
}

impl SelectorButton {
    /// Mount a new inactive button without reference.
    pub fn new(tree: &WidgetTree, label: impl Into<String>) -> Rc<Self> {
        Self::build(tree, label.into(), None)
    }

    /// Mount a new inactive button carrying an opaque reference, which is handed to
    /// the activation callback.
    pub fn with_reference<R: Any>(tree: &WidgetTree, label: impl Into<String>, reference: R) -> Rc<Self> {
        Self::build(tree, label.into(), Some(Box::new(reference)))
    }

    fn build(tree: &WidgetTree, label: String, reference: Option<Box<dyn Any>>) -> Rc<Self> {
        let (node, button) = tree.insert(|node| Self {
            node,
            reference,
            active: Cell::new(false),
            auto_search: Cell::new(false),
            show_border: Cell::new(false),
            selected_color: Cell::new(Color::from_rgb8(0, 0, 255)),
            unselected_color: Cell::new(Color::WHITE),
            font_size: Cell::new(DEFAULT_FONT_SIZE),
            on_activate: RefCell::new(None),
        });
        tree.set_text(node, label);
        button
    }

    /// The node this button lives in.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The opaque reference.
    pub fn reference(&self) -> Option<&dyn Any> {
        self.reference.as_deref()
    }

    /// The opaque reference, if it is an `R`.
    pub fn reference_as<R: Any>(&self) -> Option<&R> {
        self.reference().and_then(|reference| reference.downcast_ref::<R>())
    }

    /// Returns if the button is active.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Set the active state directly, without side effects on siblings or callbacks.
    pub fn set_active(&self, tree: &WidgetTree, active: bool) {
        if self.active.replace(active) != active {
            tree.request_update(Update::DRAW);
        }
    }

    /// Returns if activating this button deactivates its auto-search siblings.
    pub fn auto_search(&self) -> bool {
        self.auto_search.get()
    }

    /// Set whether activating this button deactivates its auto-search siblings.
    pub fn set_auto_search(&self, auto_search: bool) {
        self.auto_search.set(auto_search);
    }

    /// Returns if a border is drawn around the button.
    pub fn show_border(&self) -> bool {
        self.show_border.get()
    }

    /// Set whether a border is drawn around the button.
    pub fn set_show_border(&self, tree: &WidgetTree, show_border: bool) {
        if self.show_border.replace(show_border) != show_border {
            tree.request_update(Update::DRAW);
        }
    }

    /// The label text.
    pub fn label(&self, tree: &WidgetTree) -> String {
        tree.text(self.node).unwrap_or_default()
    }

    /// Set the label text.
    pub fn set_label(&self, tree: &WidgetTree, label: impl Into<String>) {
        tree.set_text(self.node, label);
    }

    /// Set the background colours for the active and inactive state.
    pub fn set_colors(&self, tree: &WidgetTree, selected: Color, unselected: Color) {
        self.selected_color.set(selected);
        self.unselected_color.set(unselected);
        tree.request_update(Update::DRAW);
    }

    /// The background colour matching the current state.
    pub fn background(&self) -> Color {
        if self.is_active() {
            self.selected_color.get()
        } else {
            self.unselected_color.get()
        }
    }

    /// Set the font size used to estimate the label width.
    pub fn set_font_size(&self, font_size: f32) {
        self.font_size.set(font_size);
    }

    /// Estimated width needed to show the whole label.
    pub fn preferred_width(&self, tree: &WidgetTree) -> f32 {
        let chars = self.label(tree).chars().count() as f32;
        chars * self.font_size.get() * CHAR_WIDTH_FACTOR + LABEL_PADDING * 2.0
    }

    /// Set the activation callback, replacing any previous one.
    pub fn on_activate<F>(&self, handler: F)
    where
        F: Fn(&WidgetTree, &SelectorButton, Option<&ClickEvent>, Option<&dyn Any>) + 'static,
    {
        *self.on_activate.borrow_mut() = Some(Rc::new(handler));
    }

    /// Activate the button: deactivate auto-search siblings (if `auto_search`),
    /// become active, then fire the activation callback.
    ///
    /// Called for primary clicks; call it with `None` to synthesize an activation.
    pub fn activate(&self, tree: &WidgetTree, event: Option<&ClickEvent>) {
        if self.auto_search() {
            if let Some(parent) = tree.parent(self.node) {
                for sibling in tree.children(parent) {
                    if let Some(button) = tree.widget_as::<SelectorButton>(sibling) {
                        if button.auto_search() {
                            button.set_active(tree, false);
                        }
                    }
                }
            }
        }

        self.set_active(tree, true);

        let handler = self.on_activate.borrow().clone();
        if let Some(handler) = handler {
            handler(tree, self, event, self.reference());
        }
    }
}

impl Widget for SelectorButton {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("panekit-widgets", "SelectorButton")
    }

    fn click(&self, tree: &WidgetTree, event: &ClickEvent) {
        if !event.is_primary() {
            return;
        }
        self.activate(tree, Some(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;
    use nalgebra::Vector2;
    use panekit_core::window::MouseButton;

    fn strip_of(tree: &WidgetTree, count: usize) -> Vec<Rc<SelectorButton>> {
        let panel = Panel::new(tree);
        (0..count)
            .map(|i| {
                let button = SelectorButton::with_reference(tree, format!("Choice {}", i), i);
                button.set_auto_search(true);
                tree.attach(panel.node(), button.node()).unwrap();
                button
            })
            .collect()
    }

    fn click(tree: &WidgetTree, button: &SelectorButton) {
        tree.click(button.node(), &ClickEvent::primary(Vector2::new(1.0, 1.0)));
    }

    #[test]
    fn test_click_deactivates_auto_search_siblings() {
        let tree = WidgetTree::new();
        let buttons = strip_of(&tree, 3);

        click(&tree, &buttons[0]);
        click(&tree, &buttons[2]);

        let states: Vec<bool> = buttons.iter().map(|b| b.is_active()).collect();
        assert_eq!(states, vec![false, false, true]);
    }

    #[test]
    fn test_siblings_without_auto_search_are_left_alone() {
        let tree = WidgetTree::new();
        let buttons = strip_of(&tree, 2);
        buttons[0].set_auto_search(false);

        click(&tree, &buttons[0]);
        click(&tree, &buttons[1]);

        assert!(buttons[0].is_active());
        assert!(buttons[1].is_active());
    }

    #[test]
    fn test_callback_receives_reference_and_event() {
        let tree = WidgetTree::new();
        let buttons = strip_of(&tree, 2);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        buttons[1].on_activate(move |_, _, event, reference| {
            let index = reference.and_then(|r| r.downcast_ref::<usize>()).copied();
            sink.borrow_mut().push((event.is_some(), index));
        });

        click(&tree, &buttons[1]);
        buttons[1].activate(&tree, None);

        assert_eq!(*seen.borrow(), vec![(true, Some(1)), (false, Some(1))]);
    }

    #[test]
    fn test_disabled_and_secondary_clicks_are_ignored() {
        let tree = WidgetTree::new();
        let buttons = strip_of(&tree, 1);

        tree.set_enabled(buttons[0].node(), false);
        click(&tree, &buttons[0]);
        assert!(!buttons[0].is_active());

        tree.set_enabled(buttons[0].node(), true);
        let right_click = ClickEvent {
            button: MouseButton::Right,
            position: Vector2::zeros(),
            clicks: 1,
        };
        tree.click(buttons[0].node(), &right_click);
        assert!(!buttons[0].is_active());
    }

    #[test]
    fn test_background_follows_state() {
        let tree = WidgetTree::new();
        let button = SelectorButton::new(&tree, "Solo");
        button.set_colors(&tree, Color::from_rgb8(1, 2, 3), Color::from_rgb8(4, 5, 6));

        assert_eq!(button.background().to_rgba8().r, 4);
        button.activate(&tree, None);
        assert_eq!(button.background().to_rgba8().r, 1);
    }

    #[test]
    fn test_preferred_width_grows_with_label() {
        let tree = WidgetTree::new();
        let short = SelectorButton::new(&tree, "A");
        let long = SelectorButton::new(&tree, "A much longer label");
        assert!(long.preferred_width(&tree) > short.preferred_width(&tree));
        assert_eq!(short.preferred_width(&tree), DEFAULT_FONT_SIZE * CHAR_WIDTH_FACTOR + LABEL_PADDING * 2.0);
    }
}
