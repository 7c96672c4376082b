// src/engine/core.rs

//! Pure planning core.
//!
//! Every command is first turned into a plan against an in-memory snapshot:
//! validation happens here, before any store call, and the result describes
//! the ordered writes the async shell (`engine::runtime`) must issue. Nothing
//! in this module touches the store, Tokio or the clock.

use chrono::{Days, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::step_kinds;
use crate::engine::EngineOptions;
use crate::engine::cascade::{PendingCascade, cascade_status_for};
use crate::errors::{EntityKind, RearingError, Result};
use crate::gating::{Gate, gate_of, next_actionable};
use crate::model::{BreedingCycle, CycleChange, CycleTask, Queen, RearingSnapshot, TaskChange};
use crate::types::{CycleId, CycleStatus, FrameId, QueenStatus, StepKind, TaskId, TaskStatus};

/// One write the shell must issue against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    UpdateTask { id: TaskId, change: TaskChange },
    UpdateQueensByFrame { frame_id: FrameId, status: QueenStatus },
    UpdateCycle { id: CycleId, change: CycleChange },
    InsertQueens(Vec<Queen>),
}

/// Writes needed to complete one task.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPlan {
    pub task_id: TaskId,
    pub kind: StepKind,
    pub cycle_id: CycleId,
    pub frame_id: Option<FrameId>,
    /// Primary write; always issued first.
    pub task_change: TaskChange,
    /// Queen cascade and, when applicable, the cycle close. Issued in order
    /// after the primary write succeeded.
    pub cascade: PendingCascade,
}

/// Writes needed to cancel a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelPlan {
    pub cycle_id: CycleId,
    pub cycle_change: CycleChange,
    /// One `UpdateTask` per task that was still open.
    pub cascade: PendingCascade,
}

/// Validate that `task_id` may be completed on `today` and plan the writes.
pub fn plan_completion(
    snapshot: &RearingSnapshot,
    task_id: TaskId,
    today: NaiveDate,
    options: &EngineOptions,
) -> Result<CompletionPlan> {
    let ctx = snapshot.task(task_id).ok_or(RearingError::NotFound {
        kind: EntityKind::Task,
        id: task_id,
    })?;
    let cycle = ctx.cycle;
    let task = ctx.task;

    match gate_of(&cycle.tasks, task_id) {
        Some(Gate::Actionable) => {}
        Some(Gate::Terminal) => {
            return Err(RearingError::Validation(format!(
                "task {} ({}) is already {}",
                task_id, task.kind, task.status
            )));
        }
        Some(Gate::Locked) | None => {
            let blocking = next_actionable(&cycle.tasks)
                .map(|t| t.kind.to_string())
                .unwrap_or_else(|| "an earlier step".to_string());
            return Err(RearingError::Validation(format!(
                "task {} ({}) is locked until {} is done",
                task_id, task.kind, blocking
            )));
        }
    }

    let mut writes = Vec::new();

    match (cascade_status_for(task.kind), cycle.frame_id) {
        (Some(status), Some(frame_id)) => {
            writes.push(StoreWrite::UpdateQueensByFrame { frame_id, status });
        }
        (Some(status), None) => {
            debug!(
                task = %task_id,
                kind = %task.kind,
                %status,
                "cycle has no frame; skipping queen cascade"
            );
        }
        (None, _) => {}
    }

    let closes_cycle = options.close_cycle_on_final_step
        && cycle.status == CycleStatus::InProgress
        && cycle
            .tasks
            .iter()
            .all(|t| t.id == task_id || t.status.is_terminal());
    if closes_cycle {
        writes.push(StoreWrite::UpdateCycle {
            id: cycle.id,
            change: CycleChange {
                status: Some(CycleStatus::Completed),
                end_date: Some(today),
            },
        });
    }

    debug!(
        task = %task_id,
        kind = %task.kind,
        cycle = %cycle.id,
        dependent_writes = writes.len(),
        "completion planned"
    );

    Ok(CompletionPlan {
        task_id,
        kind: task.kind,
        cycle_id: cycle.id,
        frame_id: cycle.frame_id,
        task_change: TaskChange::done_on(today),
        cascade: PendingCascade::new(task_id, writes),
    })
}

/// Build a new in-progress cycle for `frame_id` with one pending task per
/// catalog step.
pub fn plan_start_cycle(
    snapshot: &RearingSnapshot,
    frame_id: FrameId,
    start_date: NaiveDate,
) -> Result<BreedingCycle> {
    let frame = snapshot.frame(frame_id).ok_or(RearingError::NotFound {
        kind: EntityKind::Frame,
        id: frame_id,
    })?;

    if let Some(active) = frame.active_cycle() {
        return Err(RearingError::Validation(format!(
            "frame {} already has cycle {} in progress",
            frame.reference, active.id
        )));
    }

    let last_offset = step_kinds().iter().map(|s| s.day_offset).max().unwrap_or(0);
    if start_date
        .checked_add_days(Days::new(u64::from(last_offset)))
        .is_none()
    {
        return Err(RearingError::Validation(format!(
            "start date {start_date} leaves no room for a {last_offset}-day cycle"
        )));
    }

    let cycle_id = Uuid::new_v4();
    let tasks = step_kinds()
        .iter()
        .map(|step| CycleTask {
            id: Uuid::new_v4(),
            cycle_id,
            kind: step.kind,
            day_offset: step.day_offset,
            completed_on: None,
            status: TaskStatus::Pending,
            note: String::new(),
        })
        .collect();

    Ok(BreedingCycle {
        id: cycle_id,
        frame_id: Some(frame_id),
        start_date,
        end_date: None,
        status: CycleStatus::InProgress,
        tasks,
    })
}

/// Cancel an in-progress cycle and every task of it that is still open.
pub fn plan_cancel_cycle(
    snapshot: &RearingSnapshot,
    cycle_id: CycleId,
    today: NaiveDate,
) -> Result<CancelPlan> {
    let (_, cycle) = snapshot.cycle(cycle_id).ok_or(RearingError::NotFound {
        kind: EntityKind::Cycle,
        id: cycle_id,
    })?;

    if cycle.status != CycleStatus::InProgress {
        return Err(RearingError::Validation(format!(
            "cycle {} is {} and cannot be cancelled",
            cycle_id, cycle.status
        )));
    }

    let writes = cycle
        .tasks
        .iter()
        .filter(|t| !t.status.is_terminal())
        .map(|t| StoreWrite::UpdateTask {
            id: t.id,
            change: TaskChange::status(TaskStatus::Cancelled),
        })
        .collect();

    Ok(CancelPlan {
        cycle_id,
        cycle_change: CycleChange {
            status: Some(CycleStatus::Cancelled),
            end_date: Some(today),
        },
        cascade: PendingCascade::new(cycle_id, writes),
    })
}
