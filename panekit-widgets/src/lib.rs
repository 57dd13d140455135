#![warn(missing_docs)]

//! Widget library for panekit => See `panekit` crate.
//!
//! Contains the tabbed container and the widgets it is built from.

/// Contains the [panel::Panel] widget.
pub mod panel;

/// Contains the [selector::SelectorButton] widget.
pub mod selector;

/// Contains the [separator::Separator] widget.
pub mod separator;

/// Contains the [tab_pane::TabPane] widget.
pub mod tab_pane;

/// Contains the [tab_manager::TabManager] widget.
pub mod tab_manager;

/// Contains the [error::TabsError] type.
pub mod error;
