//! Conversion from the authored flow graph to the instruction tree.
//!
//! The converter walks the graph from its start node, following plain
//! edges for linear nodes and named handles ("true"/"false" on
//! conditions, "body"/"next" on loops) for structured ones. Each branch
//! and loop body is walked in its own scope, so two branches may
//! legitimately reconverge on a shared tail; only a genuine cycle (a
//! node re-entered while still on the current path) is an error.

use roverlab_types::{
    ActionData, FlowGraph, FlowNode, FlowNodeKind, Instruction, InstructionKind, InstructionSeq,
    LoopData, MoveDir, TurnDir, HANDLE_BODY, HANDLE_FALSE, HANDLE_NEXT, HANDLE_TRUE,
};

use crate::error::ConvertError;

/// Converts an authored [`FlowGraph`] into an executable instruction
/// tree.
#[derive(Debug)]
pub struct GraphConverter<'a> {
    graph: &'a FlowGraph,
}

impl<'a> GraphConverter<'a> {
    /// Create a converter over the given graph.
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self { graph }
    }

    /// Convert the whole graph, starting from its start node.
    ///
    /// Dangling handles (a condition branch or loop body with no edge)
    /// produce empty sequences rather than errors; the degenerate
    /// program is still runnable.
    pub fn convert(&self) -> Result<InstructionSeq, ConvertError> {
        let start = self
            .graph
            .nodes
            .iter()
            .find(|n| matches!(n.kind, FlowNodeKind::Start))
            .ok_or(ConvertError::MissingStartNode)?;

        let mut sequence = Vec::new();
        let mut path = Vec::new();
        self.walk(&start.id, &mut sequence, &mut path)?;

        tracing::debug!(
            nodes = self.graph.nodes.len(),
            instructions = sequence.len(),
            "converted flow graph"
        );
        Ok(sequence)
    }

    /// Follow the chain starting at `node_id`, appending instructions to
    /// `out`. `path` holds the ids currently being expanded, for cycle
    /// detection.
    fn walk(
        &self,
        node_id: &str,
        out: &mut InstructionSeq,
        path: &mut Vec<String>,
    ) -> Result<(), ConvertError> {
        if path.iter().any(|id| id == node_id) {
            return Err(ConvertError::CycleDetected {
                node_id: node_id.to_owned(),
            });
        }
        let Some(node) = self.graph.node(node_id) else {
            // Edge to a deleted node; treat as the end of the chain.
            tracing::warn!(node_id, "edge targets a missing node");
            return Ok(());
        };

        path.push(node_id.to_owned());
        let result = self.expand(node, out, path);
        path.pop();
        result
    }

    /// Emit the instruction(s) for one node and continue along its
    /// outgoing edges.
    fn expand(
        &self,
        node: &FlowNode,
        out: &mut InstructionSeq,
        path: &mut Vec<String>,
    ) -> Result<(), ConvertError> {
        match &node.kind {
            // Start and end nodes produce nothing and pass through.
            FlowNodeKind::Start | FlowNodeKind::End => self.walk_next(&node.id, None, out, path),

            FlowNodeKind::Action { action } => {
                out.push(Instruction::new(action_kind(action)));
                self.walk_next(&node.id, None, out, path)
            }

            FlowNodeKind::CustomAction { action } => {
                out.push(Instruction::new(InstructionKind::Action { action: *action }));
                self.walk_next(&node.id, None, out, path)
            }

            // A condition node terminates the current chain: both
            // branches hang off it, and execution resumes wherever each
            // branch leads.
            FlowNodeKind::Condition { condition } => {
                let mut then_branch = Vec::new();
                if let Some(edge) = self.graph.edge_from(&node.id, Some(HANDLE_TRUE)) {
                    self.walk(&edge.target, &mut then_branch, path)?;
                }
                let mut else_branch = Vec::new();
                if let Some(edge) = self.graph.edge_from(&node.id, Some(HANDLE_FALSE)) {
                    self.walk(&edge.target, &mut else_branch, path)?;
                }
                out.push(Instruction::new(InstructionKind::If {
                    condition: condition.clone(),
                    then_branch,
                    else_branch,
                }));
                Ok(())
            }

            FlowNodeKind::Loop { data } => {
                let mut body = Vec::new();
                if let Some(edge) = self.graph.edge_from(&node.id, Some(HANDLE_BODY)) {
                    self.walk(&edge.target, &mut body, path)?;
                }
                out.push(Instruction::new(match data {
                    LoopData::Repeat { count } => InstructionKind::Repeat {
                        count: *count,
                        body,
                    },
                    LoopData::While { condition } => InstructionKind::RepeatWhile {
                        condition: condition.clone(),
                        body,
                    },
                }));
                self.walk_next(&node.id, Some(HANDLE_NEXT), out, path)
            }
        }
    }

    /// Continue along the outgoing edge with the given handle, if any.
    fn walk_next(
        &self,
        node_id: &str,
        handle: Option<&str>,
        out: &mut InstructionSeq,
        path: &mut Vec<String>,
    ) -> Result<(), ConvertError> {
        match self.graph.edge_from(node_id, handle) {
            Some(edge) => self.walk(&edge.target, out, path),
            None => Ok(()),
        }
    }
}

fn action_kind(action: &ActionData) -> InstructionKind {
    match action {
        ActionData::MoveForward => InstructionKind::Move {
            dir: MoveDir::Forward,
        },
        ActionData::MoveBackward => InstructionKind::Move {
            dir: MoveDir::Backward,
        },
        ActionData::TurnLeft => InstructionKind::Turn { dir: TurnDir::Left },
        ActionData::TurnRight => InstructionKind::Turn {
            dir: TurnDir::Right,
        },
        ActionData::PickUp => InstructionKind::PickUp,
        ActionData::PutDown => InstructionKind::PutDown,
        ActionData::Wait { seconds } => InstructionKind::Wait { seconds: *seconds },
        ActionData::Log { message } => InstructionKind::Log {
            message: message.clone(),
        },
        ActionData::CallFunction { function_id } => InstructionKind::CallFunction {
            function_id: function_id.clone(),
        },
    }
}
