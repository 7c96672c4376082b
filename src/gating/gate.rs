// src/gating/gate.rs

use crate::types::{StepKind, TaskId, TaskStatus};

/// Classification of a task with respect to the workflow gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Earliest non-terminal task of its cycle; may be marked Done.
    Actionable,
    /// Pending or Overdue, but an earlier step is still open.
    Locked,
    /// Done or Cancelled. Display-only.
    Terminal,
}

impl Gate {
    pub fn is_actionable(self) -> bool {
        self == Gate::Actionable
    }
}

/// Gate of one task, in gating order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskGate {
    pub task_id: TaskId,
    pub kind: StepKind,
    pub day_offset: u32,
    pub status: TaskStatus,
    pub gate: Gate,
}
