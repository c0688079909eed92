//! Energy costs and pacing durations per instruction kind.

use std::time::Duration;

use roverlab_types::{ActionKind, InstructionKind};

/// Energy cost and pacing duration lookup for instructions.
///
/// Control-flow instructions (loops, branches, calls) are free and
/// instantaneous; only their bodies cost anything. `wait` is free but
/// takes its authored duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostTable;

impl CostTable {
    /// Energy debited when the instruction's effects apply.
    pub fn cost(&self, kind: &InstructionKind) -> f64 {
        match kind {
            InstructionKind::Move { .. } => 1.0,
            InstructionKind::Turn { .. } => 0.5,
            InstructionKind::PickUp => 2.0,
            InstructionKind::PutDown => 1.0,
            InstructionKind::Action { action } => match action {
                ActionKind::Activate | ActionKind::Use => 2.0,
                ActionKind::Scan | ActionKind::Open | ActionKind::Close => 1.0,
                ActionKind::Repair | ActionKind::Destroy => 3.0,
                ActionKind::Build => 5.0,
            },
            InstructionKind::Log { .. } => 0.5,
            InstructionKind::Wait { .. }
            | InstructionKind::Repeat { .. }
            | InstructionKind::RepeatWhile { .. }
            | InstructionKind::If { .. }
            | InstructionKind::CallFunction { .. } => 0.0,
        }
    }

    /// Animation-pacing delay observed after the instruction completes.
    pub fn duration(&self, kind: &InstructionKind) -> Duration {
        let millis = match kind {
            InstructionKind::Move { .. } | InstructionKind::PutDown => 1000,
            InstructionKind::Turn { .. } | InstructionKind::Log { .. } => 500,
            InstructionKind::PickUp => 1500,
            InstructionKind::Action { action } => match action {
                ActionKind::Activate | ActionKind::Use => 1500,
                ActionKind::Scan | ActionKind::Open | ActionKind::Close => 1000,
                ActionKind::Repair | ActionKind::Destroy => 2000,
                ActionKind::Build => 3000,
            },
            InstructionKind::Wait { seconds } => {
                return Duration::from_secs_f64(seconds.max(0.0));
            }
            InstructionKind::Repeat { .. }
            | InstructionKind::RepeatWhile { .. }
            | InstructionKind::If { .. }
            | InstructionKind::CallFunction { .. } => 0,
        };
        Duration::from_millis(millis)
    }
}
