// src/gating/sequence.rs

//! Gate computation for the tasks of one cycle.
//!
//! Tasks are ordered by theoretical day offset, with the catalog position as
//! tie-breaker. Walking that order, Done and Cancelled tasks are terminal and
//! do not block; the first Pending/Overdue task is actionable and every later
//! Pending/Overdue task is locked. Calendar dates play no part.

use tracing::trace;

use crate::gating::gate::{Gate, TaskGate};
use crate::model::CycleTask;
use crate::types::TaskId;

/// Tasks of one cycle in gating order.
pub fn gating_order<'a>(tasks: impl IntoIterator<Item = &'a CycleTask>) -> Vec<&'a CycleTask> {
    let mut ordered: Vec<&CycleTask> = tasks.into_iter().collect();
    ordered.sort_by_key(|t| (t.day_offset, t.kind.catalog_index()));
    ordered
}

/// Classify every task of one cycle. The result is in gating order.
pub fn actionability<'a>(tasks: impl IntoIterator<Item = &'a CycleTask>) -> Vec<TaskGate> {
    let mut open_step_seen = false;

    gating_order(tasks)
        .into_iter()
        .map(|task| {
            let gate = if task.status.is_terminal() {
                Gate::Terminal
            } else if open_step_seen {
                Gate::Locked
            } else {
                open_step_seen = true;
                Gate::Actionable
            };

            trace!(
                task = %task.id,
                kind = %task.kind,
                day_offset = task.day_offset,
                status = %task.status,
                ?gate,
                "gated task"
            );

            TaskGate {
                task_id: task.id,
                kind: task.kind,
                day_offset: task.day_offset,
                status: task.status,
                gate,
            }
        })
        .collect()
}

/// Gate of a single task within its cycle, or `None` if it is not part of
/// `tasks`.
pub fn gate_of<'a>(tasks: impl IntoIterator<Item = &'a CycleTask>, task_id: TaskId) -> Option<Gate> {
    actionability(tasks)
        .into_iter()
        .find(|g| g.task_id == task_id)
        .map(|g| g.gate)
}

/// The one task that may currently be completed, if any.
pub fn next_actionable<'a>(
    tasks: impl IntoIterator<Item = &'a CycleTask>,
) -> Option<&'a CycleTask> {
    gating_order(tasks)
        .into_iter()
        .find(|t| !t.status.is_terminal())
}
