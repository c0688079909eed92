//! Structural validation of authored flow graphs, run before
//! conversion so the editor can surface problems without executing
//! anything.

use std::collections::BTreeSet;

use roverlab_types::{FlowGraph, FlowNodeKind};

/// Outcome of a structural graph check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphValidation {
    /// Problems that make the graph unconvertible or meaningless.
    pub errors: Vec<String>,
    /// Non-fatal oddities the author probably wants to know about.
    pub warnings: Vec<String>,
}

impl GraphValidation {
    /// True when no errors were found (warnings do not fail validation).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a graph for structural problems: a missing or duplicated start
/// node, a missing end node, and interior nodes not connected to any
/// edge.
pub fn validate_graph(graph: &FlowGraph) -> GraphValidation {
    let mut result = GraphValidation::default();

    let start_count = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.kind, FlowNodeKind::Start))
        .count();
    match start_count {
        0 => result.errors.push("program has no start node".to_owned()),
        1 => {}
        n => result
            .errors
            .push(format!("program has {n} start nodes, expected exactly one")),
    }

    let has_end = graph
        .nodes
        .iter()
        .any(|n| matches!(n.kind, FlowNodeKind::End));
    if !has_end {
        result.errors.push("program has no end node".to_owned());
    }

    let mut connected: BTreeSet<&str> = BTreeSet::new();
    for edge in &graph.edges {
        connected.insert(edge.source.as_str());
        connected.insert(edge.target.as_str());
    }
    for node in &graph.nodes {
        if matches!(node.kind, FlowNodeKind::Start | FlowNodeKind::End) {
            continue;
        }
        if !connected.contains(node.id.as_str()) {
            result
                .errors
                .push(format!("node '{}' is not connected to the program", node.id));
        }
    }

    for node in &graph.nodes {
        if matches!(node.kind, FlowNodeKind::Loop { .. })
            && graph
                .edge_from(&node.id, Some(roverlab_types::HANDLE_BODY))
                .is_none()
        {
            result
                .warnings
                .push(format!("loop node '{}' has an empty body", node.id));
        }
    }

    if !result.errors.is_empty() {
        tracing::debug!(errors = result.errors.len(), "graph failed validation");
    }
    result
}

#[cfg(test)]
mod tests {
    use roverlab_types::{ActionData, FlowEdge, FlowNode, LoopData, HANDLE_BODY};

    use super::*;

    fn node(id: &str, kind: FlowNodeKind) -> FlowNode {
        FlowNode {
            id: id.to_owned(),
            kind,
        }
    }

    fn minimal_graph() -> FlowGraph {
        FlowGraph {
            nodes: vec![node("start", FlowNodeKind::Start), node("end", FlowNodeKind::End)],
            edges: vec![FlowEdge::plain("e1", "start", "end")],
        }
    }

    #[test]
    fn minimal_graph_is_valid() {
        let result = validate_graph(&minimal_graph());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_start_and_end_are_reported() {
        let graph = FlowGraph::default();
        let result = validate_graph(&graph);
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn disconnected_interior_node_is_an_error() {
        let mut graph = minimal_graph();
        graph.nodes.push(node(
            "orphan",
            FlowNodeKind::Action {
                action: ActionData::MoveForward,
            },
        ));
        let result = validate_graph(&graph);
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("orphan"));
    }

    #[test]
    fn empty_loop_body_is_a_warning_only() {
        let mut graph = minimal_graph();
        graph.nodes.push(node(
            "loop",
            FlowNodeKind::Loop {
                data: LoopData::Repeat { count: 2 },
            },
        ));
        graph.edges.push(FlowEdge::plain("e2", "end", "loop"));
        let result = validate_graph(&graph);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);

        graph
            .edges
            .push(FlowEdge::with_handle("e3", "loop", "start", HANDLE_BODY));
        let result = validate_graph(&graph);
        assert!(result.warnings.is_empty());
    }
}
