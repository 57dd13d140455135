//! # Core Error Types
//!
//! Errors raised by the widget tree and by configuration parsing.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors that can occur while manipulating the [WidgetTree](crate::tree::WidgetTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The node was destroyed or never existed.
    #[error("Node {0} not found in the widget tree")]
    NodeNotFound(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("Attaching {child} to {parent} would create a cycle")]
    Cycle {
        /// The requested parent.
        parent: NodeId,
        /// The requested child.
        child: NodeId,
    },
}

/// Errors that can occur while reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML source could not be parsed into a configuration.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A colour string was not `#rrggbb` or `#rrggbbaa`.
    #[error("Invalid hex color '{0}'")]
    InvalidColor(String),
}
