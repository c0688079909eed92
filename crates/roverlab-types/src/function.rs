//! User-authored functions: named subroutines stored outside the
//! instruction tree and resolved by the executor at call time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::instruction::InstructionSeq;

/// A user-authored subroutine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserFunction {
    /// Stable identifier referenced by `CallFunction` instructions.
    pub id: String,
    /// Display name chosen by the author.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// The function body, executed like any instruction sequence.
    pub body: InstructionSeq,
    /// When the function was created.
    pub created_at: DateTime<Utc>,
    /// How many times the function has been invoked.
    #[serde(default)]
    pub usage_count: u32,
}

impl UserFunction {
    /// Create a function with an empty description and zero usage.
    pub fn new(id: impl Into<String>, name: impl Into<String>, body: InstructionSeq) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            body,
            created_at: Utc::now(),
            usage_count: 0,
        }
    }

    /// The function ids this function calls directly.
    pub fn direct_calls(&self) -> Vec<&str> {
        let mut calls = Vec::new();
        collect_calls(&self.body, &mut calls);
        calls
    }
}

fn collect_calls<'a>(seq: &'a InstructionSeq, out: &mut Vec<&'a str>) {
    use crate::instruction::InstructionKind;
    for inst in seq {
        match &inst.kind {
            InstructionKind::CallFunction { function_id } => out.push(function_id),
            InstructionKind::Repeat { body, .. } | InstructionKind::RepeatWhile { body, .. } => {
                collect_calls(body, out);
            }
            InstructionKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                collect_calls(then_branch, out);
                collect_calls(else_branch, out);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, InstructionKind};

    #[test]
    fn direct_calls_sees_nested_bodies() {
        let func = UserFunction::new(
            "collect",
            "Collect sample",
            vec![Instruction::new(InstructionKind::Repeat {
                count: 2,
                body: vec![Instruction::new(InstructionKind::CallFunction {
                    function_id: "approach".to_owned(),
                })],
            })],
        );
        assert_eq!(func.direct_calls(), vec!["approach"]);
    }
}
