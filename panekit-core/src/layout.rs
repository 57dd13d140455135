use nalgebra::Vector2;

use crate::tree::{NodeId, WidgetTree};

/// A rectangle in parent-independent window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Top-left corner.
    pub location: Vector2<f32>,
    /// Width and height.
    pub size: Vector2<f32>,
}

impl Bounds {
    /// Create bounds from a position and a size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            location: Vector2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// The x coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.location.x + self.size.x
    }

    /// The y coordinate of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.location.y + self.size.y
    }

    /// Returns if the point lies inside the bounds (right and bottom edges excluded).
    pub fn contains(&self, point: Vector2<f32>) -> bool {
        point.x >= self.location.x
            && point.y >= self.location.y
            && point.x < self.right()
            && point.y < self.bottom()
    }
}

/// The edge of its parent a widget is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dock {
    /// Not docked, the bounds are left untouched by the layout pass.
    #[default]
    None,
    /// Docked to the top edge, spanning the full width.
    Top,
    /// Docked to the bottom edge, spanning the full width.
    Bottom,
    /// Docked to the left edge, spanning the full height.
    Left,
    /// Docked to the right edge, spanning the full height.
    Right,
    /// Takes whatever space the edge-docked siblings leave.
    Fill,
}

/// Orientation of a line or strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Place the visible children of `container` according to their [Dock] edge.
///
/// Children are processed in child order. Edge-docked children keep their current
/// extent across the docking axis (height for top/bottom, width for left/right) and
/// consume it from the remaining area. `Fill` children are placed last, in the area
/// left over once every edge child has been placed.
pub fn dock_layout(tree: &WidgetTree, container: NodeId) {
    let Some(outer) = tree.bounds(container) else {
        return;
    };

    let mut remaining = outer;
    let mut fill = Vec::new();

    for child in tree.children(container) {
        if !tree.is_visible(child) {
            continue;
        }

        let current = tree.bounds(child).unwrap_or_default();
        let placed = match tree.dock(child) {
            Dock::None => continue,
            Dock::Fill => {
                fill.push(child);
                continue;
            },
            Dock::Top => {
                let height = current.size.y.min(remaining.size.y).max(0.0);
                let placed = Bounds::new(remaining.location.x, remaining.location.y, remaining.size.x, height);
                remaining.location.y += height;
                remaining.size.y -= height;
                placed
            },
            Dock::Bottom => {
                let height = current.size.y.min(remaining.size.y).max(0.0);
                let placed = Bounds::new(remaining.location.x, remaining.bottom() - height, remaining.size.x, height);
                remaining.size.y -= height;
                placed
            },
            Dock::Left => {
                let width = current.size.x.min(remaining.size.x).max(0.0);
                let placed = Bounds::new(remaining.location.x, remaining.location.y, width, remaining.size.y);
                remaining.location.x += width;
                remaining.size.x -= width;
                placed
            },
            Dock::Right => {
                let width = current.size.x.min(remaining.size.x).max(0.0);
                let placed = Bounds::new(remaining.right() - width, remaining.location.y, width, remaining.size.y);
                remaining.size.x -= width;
                placed
            },
        };

        tree.set_bounds(child, placed);
    }

    for child in fill {
        tree.set_bounds(child, remaining);
    }

    log::trace!("Dock layout of {} left {:?} for fill children", container, remaining);
}
