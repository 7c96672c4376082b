// src/engine/mod.rs

//! Rearing workflow engine.
//!
//! The pure planning core lives in [`core`] (completion, cycle start/cancel)
//! and [`frames`] (frame/queen creation); [`cascade`] holds the step → queen
//! status mapping. [`runtime`] is the async shell that fetches a snapshot,
//! asks the core for a plan and issues the planned writes against a
//! [`CycleStore`](crate::store::CycleStore) in order.

use std::time::Duration;

pub mod cascade;
pub mod core;
pub mod frames;
pub mod runtime;

pub use self::cascade::{PendingCascade, cascade_status_for};
pub use self::core::{
    CancelPlan, CompletionPlan, StoreWrite, plan_cancel_cycle, plan_completion, plan_start_cycle,
};
pub use self::frames::{AutoQueens, FramePlan, NewFrame, NewQueen, plan_add_queen, plan_new_frame};
pub use self::runtime::{CascadeOutcome, CompletionReport, RearingEngine};

/// Options shared by the core and the async shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Upper bound for a single store call; exceeding it counts as the store
    /// being unavailable.
    pub store_timeout: Duration,
    /// Mark the cycle Completed when its last open task is completed.
    pub close_cycle_on_final_step: bool,
    /// Cell count for new frames that don't specify one.
    pub default_cell_count: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
            close_cycle_on_final_step: true,
            default_cell_count: 20,
        }
    }
}
