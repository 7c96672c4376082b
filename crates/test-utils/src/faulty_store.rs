use std::future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use queen_rearing::model::{
    BreedingCycle, BreedingFrame, CycleChange, CycleTask, FrameDeletion, Queen, QueenChange,
    TaskChange, TaskOverviewEntry,
};
use queen_rearing::store::{CycleStore, StoreError, StoreFuture};
use queen_rearing::types::{CycleId, FrameId, QueenId, QueenStatus, TaskId};

/// Store call names as recorded by [`FaultyStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    LoadFrames,
    LoadOverview,
    UpdateTask,
    UpdateCycle,
    UpdateQueensByFrame,
    UpdateQueen,
    InsertFrame,
    InsertQueens,
    InsertCycle,
    DeleteFrame,
}

/// Wraps a store and fails selected calls on demand.
///
/// Every call is recorded in order, whether it fails or not. Flags can be
/// flipped while the engine holds a clone.
#[derive(Clone)]
pub struct FaultyStore<S> {
    inner: S,
    fail_task_updates: Arc<AtomicBool>,
    fail_cycle_updates: Arc<AtomicBool>,
    fail_queen_updates: Arc<AtomicBool>,
    fail_all: Arc<AtomicBool>,
    stall_writes: Arc<AtomicBool>,
    /// Reads left before every read fails; `usize::MAX` disables the countdown.
    reads_left: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl<S: CycleStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_task_updates: Arc::default(),
            fail_cycle_updates: Arc::default(),
            fail_queen_updates: Arc::default(),
            fail_all: Arc::default(),
            stall_writes: Arc::default(),
            reads_left: Arc::new(AtomicUsize::new(usize::MAX)),
            calls: Arc::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_task_updates(&self, on: bool) {
        self.fail_task_updates.store(on, Ordering::SeqCst);
    }

    pub fn fail_cycle_updates(&self, on: bool) {
        self.fail_cycle_updates.store(on, Ordering::SeqCst);
    }

    /// Fails both the bulk per-frame update and single queen edits.
    pub fn fail_queen_updates(&self, on: bool) {
        self.fail_queen_updates.store(on, Ordering::SeqCst);
    }

    pub fn fail_all(&self, on: bool) {
        self.fail_all.store(on, Ordering::SeqCst);
    }

    /// Make every write hang forever; reads still go through.
    pub fn stall_writes(&self, on: bool) {
        self.stall_writes.store(on, Ordering::SeqCst);
    }

    /// Let the next `n` reads through, then fail every read after them.
    pub fn fail_reads_after(&self, n: usize) {
        self.reads_left.store(n, Ordering::SeqCst);
    }

    /// Undo [`FaultyStore::fail_reads_after`].
    pub fn allow_reads(&self) {
        self.reads_left.store(usize::MAX, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Writes only, in the order they were issued.
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, StoreCall::LoadFrames | StoreCall::LoadOverview))
            .collect()
    }

    fn intercept<'a, T: Send + 'a>(
        &'a self,
        call: StoreCall,
        flag: Option<&AtomicBool>,
        forward: impl FnOnce() -> StoreFuture<'a, T>,
    ) -> StoreFuture<'a, T> {
        self.calls.lock().unwrap().push(call);

        let is_write = !matches!(call, StoreCall::LoadFrames | StoreCall::LoadOverview);
        let reads_exhausted = !is_write
            && self
                .reads_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                    usize::MAX => Some(left),
                    0 => None,
                    _ => Some(left - 1),
                })
                .is_err();
        if reads_exhausted
            || self.fail_all.load(Ordering::SeqCst)
            || flag.is_some_and(|f| f.load(Ordering::SeqCst))
        {
            return Box::pin(future::ready(Err(StoreError::Unavailable(format!(
                "injected failure on {call:?}"
            )))));
        }
        if is_write && self.stall_writes.load(Ordering::SeqCst) {
            return Box::pin(future::pending());
        }
        forward()
    }
}

impl<S: CycleStore> CycleStore for FaultyStore<S> {
    fn load_frames(&self) -> StoreFuture<'_, Vec<BreedingFrame>> {
        self.intercept(StoreCall::LoadFrames, None, || self.inner.load_frames())
    }

    fn load_pending_task_overview(&self) -> StoreFuture<'_, Vec<TaskOverviewEntry>> {
        self.intercept(StoreCall::LoadOverview, None, || {
            self.inner.load_pending_task_overview()
        })
    }

    fn update_task(&self, id: TaskId, change: TaskChange) -> StoreFuture<'_, CycleTask> {
        self.intercept(StoreCall::UpdateTask, Some(&self.fail_task_updates), || {
            self.inner.update_task(id, change)
        })
    }

    fn update_cycle(&self, id: CycleId, change: CycleChange) -> StoreFuture<'_, BreedingCycle> {
        self.intercept(StoreCall::UpdateCycle, Some(&self.fail_cycle_updates), || {
            self.inner.update_cycle(id, change)
        })
    }

    fn update_queens_by_frame(
        &self,
        frame_id: FrameId,
        status: QueenStatus,
    ) -> StoreFuture<'_, Vec<Queen>> {
        self.intercept(
            StoreCall::UpdateQueensByFrame,
            Some(&self.fail_queen_updates),
            || self.inner.update_queens_by_frame(frame_id, status),
        )
    }

    fn update_queen(&self, id: QueenId, change: QueenChange) -> StoreFuture<'_, Queen> {
        self.intercept(StoreCall::UpdateQueen, Some(&self.fail_queen_updates), || {
            self.inner.update_queen(id, change)
        })
    }

    fn insert_frame(&self, frame: BreedingFrame) -> StoreFuture<'_, BreedingFrame> {
        self.intercept(StoreCall::InsertFrame, None, || self.inner.insert_frame(frame))
    }

    fn insert_queens(&self, queens: Vec<Queen>) -> StoreFuture<'_, Vec<Queen>> {
        self.intercept(StoreCall::InsertQueens, None, || self.inner.insert_queens(queens))
    }

    fn insert_cycle(&self, cycle: BreedingCycle) -> StoreFuture<'_, BreedingCycle> {
        self.intercept(StoreCall::InsertCycle, None, || self.inner.insert_cycle(cycle))
    }

    fn delete_frame_cascade(&self, frame_id: FrameId) -> StoreFuture<'_, FrameDeletion> {
        self.intercept(StoreCall::DeleteFrame, None, || {
            self.inner.delete_frame_cascade(frame_id)
        })
    }
}
