// src/engine/runtime.rs

use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::EngineOptions;
use super::cascade::PendingCascade;
use super::core::{StoreWrite, plan_cancel_cycle, plan_completion, plan_start_cycle};
use super::frames::{NewFrame, NewQueen, plan_add_queen, plan_new_frame};
use crate::errors::{RearingError, Result};
use crate::model::{
    BreedingCycle, BreedingFrame, CycleTask, FrameDeletion, Queen, QueenChange, RearingSnapshot,
};
use crate::store::{CycleStore, StoreError, StoreFuture, StoreResult};
use crate::types::{CycleId, FrameId, QueenId, QueenStatus, StepKind, TaskId};
use crate::view::Dashboard;

/// What the dependent writes of a command produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeOutcome {
    pub queens_updated: Vec<Queen>,
    pub tasks_updated: Vec<CycleTask>,
    pub cycle: Option<BreedingCycle>,
}

/// Result of a fully applied task completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub task: CycleTask,
    pub kind: StepKind,
    pub frame_id: Option<FrameId>,
    pub cascade: CascadeOutcome,
}

impl CompletionReport {
    /// Whether the completion also closed the cycle.
    pub fn closed_cycle(&self) -> bool {
        self.cascade.cycle.is_some()
    }
}

/// Async shell around the planning core.
///
/// Every command re-reads the store, plans against that snapshot and then
/// issues the planned writes one after the other. Nothing is cached between
/// commands, so a failed command leaves no local state behind.
pub struct RearingEngine<S: CycleStore> {
    store: S,
    options: EngineOptions,
}

impl<S: CycleStore> fmt::Debug for RearingEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RearingEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: CycleStore> RearingEngine<S> {
    pub fn new(store: S, options: EngineOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Fresh snapshot of every frame with its queens, cycles and tasks.
    pub async fn snapshot(&self) -> Result<RearingSnapshot> {
        let frames = self.call("load_frames", self.store.load_frames()).await?;
        Ok(RearingSnapshot::new(frames))
    }

    /// Rebuild the dashboard from the store.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let frames = self.call("load_frames", self.store.load_frames()).await?;
        let overview = self
            .call(
                "load_pending_task_overview",
                self.store.load_pending_task_overview(),
            )
            .await?;
        Ok(Dashboard::build(&frames, &overview))
    }

    /// Mark a task Done today and apply its cascade.
    pub async fn complete_task(&self, task_id: TaskId) -> Result<CompletionReport> {
        self.complete_task_on(task_id, Local::now().date_naive())
            .await
    }

    /// Mark a task Done on `today` and apply its cascade.
    ///
    /// The task write is issued first. If it fails nothing was changed. If a
    /// dependent write fails afterwards, the error is
    /// [`RearingError::CascadePartialFailure`] and the task stays Done.
    pub async fn complete_task_on(
        &self,
        task_id: TaskId,
        today: NaiveDate,
    ) -> Result<CompletionReport> {
        let snapshot = self.snapshot().await?;
        let plan = plan_completion(&snapshot, task_id, today, &self.options)?;

        let task = self
            .call(
                "update_task",
                self.store.update_task(plan.task_id, plan.task_change.clone()),
            )
            .await?;
        info!(task = %task_id, kind = %plan.kind, "task marked done");

        let cascade = self.apply_cascade(&plan.cascade).await?;

        Ok(CompletionReport {
            task,
            kind: plan.kind,
            frame_id: plan.frame_id,
            cascade,
        })
    }

    /// Re-issue the dependent writes reported by a
    /// [`RearingError::CascadePartialFailure`].
    pub async fn retry_cascade(&self, pending: &PendingCascade) -> Result<CascadeOutcome> {
        info!(
            origin = %pending.origin,
            writes = pending.writes.len(),
            "retrying cascade"
        );
        self.apply_cascade(pending).await
    }

    /// Start a new cycle on a frame with the seven catalog tasks.
    pub async fn start_cycle(&self, frame_id: FrameId, start_date: NaiveDate) -> Result<BreedingCycle> {
        let snapshot = self.snapshot().await?;
        let cycle = plan_start_cycle(&snapshot, frame_id, start_date)?;
        let cycle = self
            .call("insert_cycle", self.store.insert_cycle(cycle))
            .await?;
        info!(frame = %frame_id, cycle = %cycle.id, %start_date, "cycle started");
        Ok(cycle)
    }

    /// Cancel an in-progress cycle together with its open tasks.
    pub async fn cancel_cycle(&self, cycle_id: CycleId, today: NaiveDate) -> Result<BreedingCycle> {
        let snapshot = self.snapshot().await?;
        let plan = plan_cancel_cycle(&snapshot, cycle_id, today)?;

        let mut cycle = self
            .call(
                "update_cycle",
                self.store.update_cycle(plan.cycle_id, plan.cycle_change.clone()),
            )
            .await?;
        info!(cycle = %cycle_id, "cycle cancelled");

        let outcome = self.apply_cascade(&plan.cascade).await?;

        // The cycle row was read back before its tasks were cancelled.
        for task in cycle.tasks.iter_mut() {
            if let Some(updated) = outcome.tasks_updated.iter().find(|t| t.id == task.id) {
                *task = updated.clone();
            }
        }
        Ok(cycle)
    }

    /// Create a frame and, when requested, one queen per cell.
    pub async fn create_frame(&self, input: NewFrame) -> Result<BreedingFrame> {
        let plan = plan_new_frame(input, &self.options)?;

        let mut frame = self
            .call("insert_frame", self.store.insert_frame(plan.frame))
            .await?;
        info!(frame = %frame.id, reference = %frame.reference, "frame created");

        if !plan.queens.is_empty() {
            let pending = PendingCascade::new(frame.id, vec![StoreWrite::InsertQueens(plan.queens)]);
            let outcome = self.apply_cascade(&pending).await?;
            frame.queens = outcome.queens_updated;
        }
        Ok(frame)
    }

    /// Add a queen to a frame that still has a free cell.
    pub async fn add_queen(&self, frame_id: FrameId, input: NewQueen) -> Result<Queen> {
        let snapshot = self.snapshot().await?;
        let queen = plan_add_queen(&snapshot, frame_id, input)?;
        let mut inserted = self
            .call("insert_queens", self.store.insert_queens(vec![queen]))
            .await?;
        inserted.pop().ok_or_else(|| {
            RearingError::StoreUnavailable("insert_queens returned no row".to_string())
        })
    }

    /// Direct status edit of one queen.
    pub async fn set_queen_status(&self, queen_id: QueenId, status: QueenStatus) -> Result<Queen> {
        let change = QueenChange {
            status: Some(status),
            ..QueenChange::default()
        };
        self.call("update_queen", self.store.update_queen(queen_id, change))
            .await
    }

    /// Cascade delete of a frame.
    pub async fn delete_frame(&self, frame_id: FrameId) -> Result<FrameDeletion> {
        let deletion = self
            .call("delete_frame_cascade", self.store.delete_frame_cascade(frame_id))
            .await?;
        info!(
            frame = %frame_id,
            cycles = deletion.cycles_removed,
            tasks = deletion.tasks_removed,
            queens = deletion.queens_detached,
            "frame deleted"
        );
        Ok(deletion)
    }

    /// Issue the dependent writes in order. Stops at the first failure and
    /// reports it together with everything not yet applied.
    async fn apply_cascade(&self, pending: &PendingCascade) -> Result<CascadeOutcome> {
        let mut outcome = CascadeOutcome::default();

        for (index, write) in pending.writes.iter().enumerate() {
            if let Err(err) = self.apply_write(write, &mut outcome).await {
                warn!(
                    origin = %pending.origin,
                    failed_write = index,
                    error = %err,
                    "cascade partially applied"
                );
                return Err(RearingError::CascadePartialFailure {
                    pending: pending.remaining_from(index),
                    reason: err.to_string(),
                });
            }
        }

        Ok(outcome)
    }

    async fn apply_write(&self, write: &StoreWrite, outcome: &mut CascadeOutcome) -> StoreResult<()> {
        match write {
            StoreWrite::UpdateTask { id, change } => {
                let task = self
                    .call_store("update_task", self.store.update_task(*id, change.clone()))
                    .await?;
                outcome.tasks_updated.push(task);
            }
            StoreWrite::UpdateQueensByFrame { frame_id, status } => {
                let queens = self
                    .call_store(
                        "update_queens_by_frame",
                        self.store.update_queens_by_frame(*frame_id, *status),
                    )
                    .await?;
                info!(frame = %frame_id, %status, queens = queens.len(), "queen cascade applied");
                outcome.queens_updated.extend(queens);
            }
            StoreWrite::UpdateCycle { id, change } => {
                let cycle = self
                    .call_store("update_cycle", self.store.update_cycle(*id, change.clone()))
                    .await?;
                info!(cycle = %id, status = %cycle.status, "cycle updated");
                outcome.cycle = Some(cycle);
            }
            StoreWrite::InsertQueens(queens) => {
                let inserted = self
                    .call_store("insert_queens", self.store.insert_queens(queens.clone()))
                    .await?;
                outcome.queens_updated.extend(inserted);
            }
        }
        Ok(())
    }

    async fn call<T>(&self, what: &'static str, fut: StoreFuture<'_, T>) -> Result<T> {
        self.call_store(what, fut).await.map_err(RearingError::from)
    }

    /// Run one store call under the configured timeout.
    async fn call_store<T>(&self, what: &'static str, fut: StoreFuture<'_, T>) -> StoreResult<T> {
        debug!(call = what, "store call");
        match tokio::time::timeout(self.options.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "{what} timed out after {:?}",
                self.options.store_timeout
            ))),
        }
    }
}
