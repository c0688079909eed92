//! The authored flow graph: the node/edge structure produced by the
//! visual editor, before conversion to an instruction tree.
//!
//! The graph is an immutable value replaced wholesale on edit; nothing
//! in the execution core mutates it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ActionKind;

/// Edge handle name for the true branch of a condition node.
pub const HANDLE_TRUE: &str = "true";
/// Edge handle name for the false branch of a condition node.
pub const HANDLE_FALSE: &str = "false";
/// Edge handle name for the body of a loop node.
pub const HANDLE_BODY: &str = "body";
/// Edge handle name for the continuation after a loop node.
pub const HANDLE_NEXT: &str = "next";

/// A complete authored program graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowGraph {
    /// All nodes, keyed by their editor-assigned string ids.
    pub nodes: Vec<FlowNode>,
    /// All edges between nodes.
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The first edge leaving `source` through the given handle
    /// (`None` matches edges without a handle).
    pub fn edge_from(&self, source: &str, handle: Option<&str>) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.source_handle.as_deref() == handle)
    }
}

/// One node of the authored graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowNode {
    /// Editor-assigned node identifier.
    pub id: String,
    /// The node's kind and kind-specific payload.
    pub kind: FlowNodeKind,
}

/// Node kinds with their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum FlowNodeKind {
    /// Program entry point. Produces no instruction.
    Start,
    /// Program terminator. Produces no instruction.
    End,
    /// A basic robot command.
    Action {
        /// Which command.
        action: ActionData,
    },
    /// A configurable world-interaction command.
    CustomAction {
        /// Which interaction.
        action: ActionKind,
    },
    /// A conditional with "true"/"false" branch handles.
    Condition {
        /// Condition text for the condition evaluator.
        condition: String,
    },
    /// A loop with "body"/"next" handles.
    Loop {
        /// Fixed-count or conditional looping.
        data: LoopData,
    },
}

/// Payload of a basic action node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "command", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ActionData {
    /// Move one cell forward.
    MoveForward,
    /// Move one cell backward.
    MoveBackward,
    /// Turn 90 degrees left.
    TurnLeft,
    /// Turn 90 degrees right.
    TurnRight,
    /// Pick up from the current cell.
    PickUp,
    /// Put down on the current cell.
    PutDown,
    /// Wait for a number of seconds.
    Wait {
        /// Seconds to wait.
        seconds: f64,
    },
    /// Broadcast a message / activate a station.
    Log {
        /// Message text.
        message: String,
    },
    /// Invoke a user-authored function.
    CallFunction {
        /// The function identifier.
        function_id: String,
    },
}

/// Loop node payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "loopKind", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum LoopData {
    /// Fixed iteration count.
    Repeat {
        /// Number of iterations.
        count: u32,
    },
    /// Conditional loop.
    While {
        /// Condition text for the condition evaluator.
        condition: String,
    },
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowEdge {
    /// Editor-assigned edge identifier.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Named source handle: "true"/"false" on condition nodes,
    /// "body"/"next" on loop nodes, absent on linear nodes.
    #[serde(default)]
    pub source_handle: Option<String>,
}

impl FlowEdge {
    /// Create an edge without a source handle.
    pub fn plain(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    /// Create an edge leaving through a named source handle.
    pub fn with_handle(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Some(handle.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_lookup_respects_handles() {
        let graph = FlowGraph {
            nodes: vec![FlowNode {
                id: "loop1".to_owned(),
                kind: FlowNodeKind::Loop {
                    data: LoopData::Repeat { count: 3 },
                },
            }],
            edges: vec![
                FlowEdge::with_handle("e1", "loop1", "a", HANDLE_BODY),
                FlowEdge::with_handle("e2", "loop1", "b", HANDLE_NEXT),
            ],
        };

        let body = graph.edge_from("loop1", Some(HANDLE_BODY));
        assert_eq!(body.map(|e| e.target.as_str()), Some("a"));
        let next = graph.edge_from("loop1", Some(HANDLE_NEXT));
        assert_eq!(next.map(|e| e.target.as_str()), Some("b"));
        assert!(graph.edge_from("loop1", None).is_none());
    }
}
