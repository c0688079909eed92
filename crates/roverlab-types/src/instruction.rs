//! The instruction tree: the structured, branch-resolved program
//! representation consumed by the executor.
//!
//! Instructions are immutable once converted. An instruction tree
//! carries no execution state (the executor's cursor lives outside it),
//! so the same tree can be re-run across resets.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionKind, MoveDir, TurnDir};
use crate::ids::InstructionId;

/// A sequence of instructions executed in order.
pub type InstructionSeq = Vec<Instruction>;

/// One node of the instruction tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Instruction {
    /// Stable identifier used for "current instruction" progress events.
    pub id: InstructionId,
    /// What the instruction does.
    pub kind: InstructionKind,
}

impl Instruction {
    /// Wrap a kind with a freshly generated identifier.
    pub fn new(kind: InstructionKind) -> Self {
        Self {
            id: InstructionId::new(),
            kind,
        }
    }
}

/// The closed set of instruction variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum InstructionKind {
    /// Move one cell forward or backward.
    Move {
        /// Relative move direction.
        dir: MoveDir,
    },
    /// Rotate 90 degrees in place.
    Turn {
        /// Rotation direction.
        dir: TurnDir,
    },
    /// Pick up the resource or container on the current cell.
    PickUp,
    /// Put down the top inventory item on the current cell.
    PutDown,
    /// A generic world interaction (activate, scan, repair, ...).
    Action {
        /// Which interaction.
        action: ActionKind,
    },
    /// Pause for a number of seconds (pacing only, no world effect).
    Wait {
        /// Seconds to wait.
        seconds: f64,
    },
    /// Broadcast a message; activates a station if standing on one.
    Log {
        /// The message text.
        message: String,
    },
    /// Execute the body a fixed number of times.
    Repeat {
        /// Iteration count.
        count: u32,
        /// Nested body sequence.
        body: InstructionSeq,
    },
    /// Execute the body while a condition holds. The condition is
    /// re-evaluated before each iteration and after every instruction
    /// inside the body.
    RepeatWhile {
        /// Condition text for the condition evaluator.
        condition: String,
        /// Nested body sequence.
        body: InstructionSeq,
    },
    /// Evaluate a condition once and execute exactly one branch.
    If {
        /// Condition text for the condition evaluator.
        condition: String,
        /// Executed when the condition is true.
        then_branch: InstructionSeq,
        /// Executed when the condition is false.
        else_branch: InstructionSeq,
    },
    /// Invoke a user-authored function by identifier.
    CallFunction {
        /// The function identifier, resolved through the executor's
        /// function lookup at call time.
        function_id: String,
    },
}

/// Whether any instruction in the sequence (including nested bodies and
/// branches) satisfies the predicate.
///
/// Used by objective checks like "did the program use a loop". Function
/// bodies behind [`InstructionKind::CallFunction`] are not traversed:
/// they live outside the tree.
pub fn sequence_contains<F>(seq: &[Instruction], pred: &F) -> bool
where
    F: Fn(&InstructionKind) -> bool,
{
    for inst in seq {
        if pred(&inst.kind) {
            return true;
        }
        match &inst.kind {
            InstructionKind::Repeat { body, .. } | InstructionKind::RepeatWhile { body, .. } => {
                if sequence_contains(body, pred) {
                    return true;
                }
            }
            InstructionKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                if sequence_contains(then_branch, pred)
                    || sequence_contains(else_branch, pred)
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Count all instructions in the sequence, including nested ones.
pub fn sequence_len(seq: &[Instruction]) -> usize {
    let mut total = seq.len();
    for inst in seq {
        match &inst.kind {
            InstructionKind::Repeat { body, .. } | InstructionKind::RepeatWhile { body, .. } => {
                total += sequence_len(body);
            }
            InstructionKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                total += sequence_len(then_branch) + sequence_len(else_branch);
            }
            _ => {}
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_forward() -> Instruction {
        Instruction::new(InstructionKind::Move {
            dir: MoveDir::Forward,
        })
    }

    #[test]
    fn contains_finds_nested_loops() {
        let program = vec![
            move_forward(),
            Instruction::new(InstructionKind::If {
                condition: "hasItem".to_owned(),
                then_branch: vec![Instruction::new(InstructionKind::Repeat {
                    count: 3,
                    body: vec![move_forward()],
                })],
                else_branch: vec![],
            }),
        ];

        let has_loop = sequence_contains(&program, &|kind| {
            matches!(
                kind,
                InstructionKind::Repeat { .. } | InstructionKind::RepeatWhile { .. }
            )
        });
        assert!(has_loop);

        let has_call = sequence_contains(&program, &|kind| {
            matches!(kind, InstructionKind::CallFunction { .. })
        });
        assert!(!has_call);
    }

    #[test]
    fn sequence_len_counts_nested() {
        let program = vec![Instruction::new(InstructionKind::Repeat {
            count: 2,
            body: vec![move_forward(), move_forward()],
        })];
        assert_eq!(sequence_len(&program), 3);
    }

    #[test]
    fn instruction_ids_are_unique() {
        let a = move_forward();
        let b = move_forward();
        assert_ne!(a.id, b.id);
    }
}
