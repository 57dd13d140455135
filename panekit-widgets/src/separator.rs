// SPDX-License-Identifier: LGPL-3.0-only
use panekit_core::id::WidgetId;
use panekit_core::layout::{Bounds, Orientation};
use panekit_core::tree::{NodeId, WidgetTree};
use panekit_core::update::Update;
use panekit_core::widget::Widget;
use peniko::Color;
use std::cell::Cell;
use std::rc::Rc;

/// A thin line separating two areas.
///
/// The separator reserves `thickness + spacing` across its orientation and
/// draws the line centred in that space. It never hosts children.
pub struct Separator {
    node: NodeId,
    orientation: Cell<Orientation>,
    color: Cell<Color>,
    thickness: Cell<f32>,
    spacing: Cell<f32>,
}

impl Separator {
    /// Mount a new horizontal black separator.
    pub fn new(tree: &WidgetTree) -> Rc<Self> {
        tree.insert(|node| Self {
            node,
            orientation: Cell::new(Orientation::Horizontal),
            color: Cell::new(Color::BLACK),
            thickness: Cell::new(2.0),
            spacing: Cell::new(5.0),
        })
        .1
    }

    /// The node this separator lives in.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The orientation of the line.
    pub fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    /// Set the orientation of the line.
    pub fn set_orientation(&self, tree: &WidgetTree, orientation: Orientation) {
        self.orientation.set(orientation);
        tree.request_update(Update::LAYOUT | Update::DRAW);
    }

    /// The colour of the line.
    pub fn color(&self) -> Color {
        self.color.get()
    }

    /// Set the colour of the line.
    pub fn set_color(&self, tree: &WidgetTree, color: Color) {
        self.color.set(color);
        tree.request_update(Update::DRAW);
    }

    /// The thickness of the line.
    pub fn thickness(&self) -> f32 {
        self.thickness.get()
    }

    /// Set the thickness of the line.
    pub fn set_thickness(&self, tree: &WidgetTree, thickness: f32) {
        self.thickness.set(thickness.max(0.0));
        tree.request_update(Update::LAYOUT | Update::DRAW);
    }

    /// The empty space around the line.
    pub fn spacing(&self) -> f32 {
        self.spacing.get()
    }

    /// Set the empty space around the line.
    pub fn set_spacing(&self, tree: &WidgetTree, spacing: f32) {
        self.spacing.set(spacing.max(0.0));
        tree.request_update(Update::LAYOUT | Update::DRAW);
    }

    /// Space the separator needs across its orientation.
    pub fn min_extent(&self) -> f32 {
        self.thickness() + self.spacing()
    }

    /// Where the line is drawn, centred inside the separator's bounds.
    pub fn line_bounds(&self, tree: &WidgetTree) -> Bounds {
        let outer = tree.bounds(self.node).unwrap_or_default();
        let thickness = self.thickness();
        match self.orientation() {
            Orientation::Horizontal => Bounds::new(
                outer.location.x,
                outer.location.y + (outer.size.y - thickness) / 2.0,
                outer.size.x,
                thickness,
            ),
            Orientation::Vertical => Bounds::new(
                outer.location.x + (outer.size.x - thickness) / 2.0,
                outer.location.y,
                thickness,
                outer.size.y,
            ),
        }
    }
}

impl Widget for Separator {
    fn widget_id(&self) -> WidgetId {
        WidgetId::new("panekit-widgets", "Separator")
    }

    fn child_attached(&self, tree: &WidgetTree, child: NodeId) {
        log::warn!("Separator {} does not host children, detaching {}", self.node, child);
        if let Err(e) = tree.detach(self.node, child) {
            log::error!("Failed to detach {} from separator: {}", child, e);
        }
    }
}
