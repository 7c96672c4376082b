// src/store/mod.rs

//! Boundary to the remote cycle/task store.
//!
//! The engine only talks to a [`CycleStore`]. Every call is an independent
//! remote operation: calls may fail on their own and nothing is transactional
//! across calls. The engine is responsible for sequencing its own writes.
//!
//! - [`memory`] provides [`MemoryStore`], an in-process implementation used by
//!   the CLI and by tests.
//! - [`snapshot`] loads/saves a `MemoryStore` from/to a TOML file.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use uuid::Uuid;

use crate::errors::{EntityKind, RearingError};
use crate::model::{
    BreedingCycle, BreedingFrame, CycleChange, CycleTask, FrameDeletion, Queen, QueenChange,
    TaskChange, TaskOverviewEntry,
};
use crate::types::{CycleId, FrameId, QueenId, QueenStatus, TaskId};

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStore;

/// Failure of a single store call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Transport / availability failure, including timeouts.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} {id} not found in store")]
    NotFound { kind: EntityKind, id: Uuid },

    /// The store refused the write (duplicate id, broken reference, ...).
    #[error("store rejected write: {0}")]
    Rejected(String),
}

impl From<StoreError> for RearingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RearingError::StoreUnavailable(msg),
            StoreError::NotFound { kind, id } => RearingError::NotFound { kind, id },
            StoreError::Rejected(msg) => RearingError::Validation(msg),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Boxed future returned by every store call.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Narrow interface the engine consumes.
///
/// Production deployments implement this over the remote query/mutation API;
/// tests use [`MemoryStore`] or wrap it to inject faults.
pub trait CycleStore: Send + Sync {
    /// Frames with nested queens and cycles; cycles carry their tasks ordered
    /// by day offset ascending.
    fn load_frames(&self) -> StoreFuture<'_, Vec<BreedingFrame>>;

    /// Every non-cancelled task across all cycles, ordered by expected date
    /// ascending, each with a back-reference to its cycle and frame.
    fn load_pending_task_overview(&self) -> StoreFuture<'_, Vec<TaskOverviewEntry>>;

    fn update_task(&self, id: TaskId, change: TaskChange) -> StoreFuture<'_, CycleTask>;

    fn update_cycle(&self, id: CycleId, change: CycleChange) -> StoreFuture<'_, BreedingCycle>;

    /// Set the status of every queen owned by `frame_id`. Returns the affected
    /// queens.
    fn update_queens_by_frame(
        &self,
        frame_id: FrameId,
        status: QueenStatus,
    ) -> StoreFuture<'_, Vec<Queen>>;

    fn update_queen(&self, id: QueenId, change: QueenChange) -> StoreFuture<'_, Queen>;

    /// Insert a frame row. Nested queens/cycles on the argument are ignored.
    fn insert_frame(&self, frame: BreedingFrame) -> StoreFuture<'_, BreedingFrame>;

    fn insert_queens(&self, queens: Vec<Queen>) -> StoreFuture<'_, Vec<Queen>>;

    /// Insert a cycle together with all of its tasks, atomically.
    fn insert_cycle(&self, cycle: BreedingCycle) -> StoreFuture<'_, BreedingCycle>;

    /// Remove a frame with its cycles and tasks and detach its queens.
    fn delete_frame_cascade(&self, frame_id: FrameId) -> StoreFuture<'_, FrameDeletion>;
}
