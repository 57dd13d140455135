#![warn(missing_docs)]

//! Core library for panekit => See `panekit` crate.
//!
//! Contains the live widget tree, the widget trait and the ambient
//! configuration shared by every panekit widget.

/// Contains useful types for interacting with winit.
pub mod window {
    pub use winit::event::MouseButton;
}

/// Contains the [WidgetId](id::WidgetId) type identifier.
pub mod id;

/// Contains the [WidgetTree](tree::WidgetTree), the live visual tree every widget is mounted in.
pub mod tree;

/// Contains the core widget functionalities.
pub mod widget;

/// Contains bounds, dock edges and the dock layout pass.
pub mod layout;

/// Contains the update mode bitflag.
pub mod update;

/// Contains the [ToolkitConfig](config::ToolkitConfig) struct.
pub mod config;

/// Contains the settings registry loading configuration files.
pub mod settings;

/// Contains hex (de)serialization helpers for [peniko::Color].
pub mod serde_color;

/// Contains the error types of the core.
pub mod error;
