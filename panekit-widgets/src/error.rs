use panekit_core::error::TreeError;
use panekit_core::tree::NodeId;
use thiserror::Error;

/// Error type for tab operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabsError {
    /// The pane is not registered with this tab manager.
    #[error("Tab pane {0} is not registered with this tab manager")]
    TabNotFound(NodeId),

    /// The pane is registered with a different tab manager.
    #[error("Tab pane {0} belongs to another tab manager")]
    OwnedElsewhere(NodeId),

    /// No tab at this position.
    #[error("Tab index {index} out of range ({len} tabs)")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of registered tabs.
        len: usize,
    },

    /// The pane list and the selector strip have different lengths.
    #[error("{panes} tab panes but {selectors} selectors")]
    LengthMismatch {
        /// Registered panes.
        panes: usize,
        /// Selectors in the strip.
        selectors: usize,
    },

    /// The selector at this position does not refer to the pane at the same position.
    #[error("Selector at index {index} does not refer to tab pane {pane}")]
    ReferenceMismatch {
        /// Position in both lists.
        index: usize,
        /// The pane registered at that position.
        pane: NodeId,
    },

    /// More than one selector is active, or the active one is not the mounted pane's.
    #[error("Active selectors {active:?} do not match mounted tab {mounted:?}")]
    SelectionMismatch {
        /// Positions of active selectors.
        active: Vec<usize>,
        /// Position of the mounted pane.
        mounted: Option<usize>,
    },

    /// Underlying widget tree failure.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
