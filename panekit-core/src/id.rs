//! # Widget Identifiers
//!
//! Widget IDs identify widget *types*, not instances. They consist of a
//! namespace (typically the crate name) and the widget type name, so that
//! widget libraries never clash.
//!
//! The tree uses them to answer "what kind of widget is mounted here" without
//! downcasting, which is what [ParentConstraint::Kind](crate::tree::ParentConstraint::Kind)
//! relies on.
//!
//! ```rust
//! use panekit_core::id::WidgetId;
//!
//! let button_id = WidgetId::new("panekit-widgets", "SelectorButton");
//! assert_eq!(button_id.namespace(), "panekit-widgets");
//! assert_eq!(button_id.id(), "SelectorButton");
//! assert_eq!(button_id.to_string(), "panekit-widgets:SelectorButton");
//! ```

use std::fmt::{Debug, Display, Formatter};

/// An identifier for a widget type.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct WidgetId {
    namespace: String,
    id: String,
}

impl WidgetId {
    /// Create a new widget id by a namespace and custom id.
    /// The namespace should be the crate name and the id should be the widget type name.
    pub fn new(namespace: impl ToString, id: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns the namespace of the widget id.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the actual widget id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for WidgetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}
