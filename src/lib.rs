#![warn(missing_docs)]

//! Desktop widget toolkit built around a live widget tree, with a tabbed
//! container that keeps its panes and selectors in lockstep.

pub use nalgebra as math;
pub use peniko as color;

pub use panekit_core as core;
pub use panekit_widgets as widgets;

/// A "prelude" for users of the panekit toolkit.
///
/// Importing this module brings into scope the most common types
/// needed to build a tabbed container.
///
/// ```rust
/// use panekit::prelude::*;
///
/// let tree = WidgetTree::new();
/// let tabs = TabManager::new(&tree).unwrap();
/// tree.set_bounds(tabs.node(), Bounds::new(0.0, 0.0, 640.0, 480.0));
///
/// let general = TabPane::new(&tree, "General");
/// let advanced = TabPane::new(&tree, "Advanced");
/// tabs.add_tab(&tree, &general).unwrap();
/// tabs.add_tab(&tree, &advanced).unwrap();
///
/// assert_eq!(tabs.mounted(), Some(general.node()));
/// tabs.select(&tree, 1).unwrap();
/// assert_eq!(tabs.mounted(), Some(advanced.node()));
/// ```
pub mod prelude {
    pub use crate::core::config::{TabAlignment, TabsConfig, ToolkitConfig};
    pub use crate::core::id::WidgetId;
    pub use crate::core::layout::{dock_layout, Bounds, Dock, Orientation};
    pub use crate::core::settings::SettingsRegistry;
    pub use crate::core::tree::{NodeId, ParentConstraint, WidgetTree};
    pub use crate::core::update::Update;
    pub use crate::core::widget::{ClickEvent, Widget};

    // Math
    pub use nalgebra::Vector2;

    // Color
    pub use peniko::Color;

    // Widgets
    pub use crate::widgets::error::TabsError;
    pub use crate::widgets::panel::Panel;
    pub use crate::widgets::selector::SelectorButton;
    pub use crate::widgets::separator::Separator;
    pub use crate::widgets::tab_manager::{TabKey, TabManager};
    pub use crate::widgets::tab_pane::TabPane;
}
