//! Error types for the `roverlab-flow` crate.

/// Errors that can occur while converting an authored graph into an
/// instruction tree.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The graph has no start node to begin traversal from.
    #[error("flow graph has no start node")]
    MissingStartNode,

    /// Traversal re-entered a node already on the current path.
    ///
    /// Reconvergent branches are allowed (each branch is walked with its
    /// own scope), so this only fires for a genuine cycle that would
    /// loop forever.
    #[error("flow graph contains a cycle through node '{node_id}'")]
    CycleDetected {
        /// The node at which the cycle was detected.
        node_id: String,
    },
}
