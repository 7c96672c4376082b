// src/store/memory.rs

//! In-process [`CycleStore`] backed by flat tables behind a mutex.
//!
//! Rows are kept flat the way the remote backend stores them and nested on
//! read, so the shapes returned here match what a remote implementation
//! returns.

use std::future;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CycleStore, StoreError, StoreFuture, StoreResult};
use crate::errors::EntityKind;
use crate::model::{
    BreedingCycle, BreedingFrame, CycleChange, CycleTask, FrameDeletion, Queen, QueenChange,
    TaskChange, TaskOverviewEntry,
};
use crate::types::{CycleId, CycleStatus, FrameId, QueenId, QueenStatus, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub id: FrameId,
    pub reference: String,
    pub created_on: NaiveDate,
    pub cell_count: u32,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRow {
    pub id: CycleId,
    pub frame_id: Option<FrameId>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: CycleStatus,
}

/// Flat tables. This is also the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub frames: Vec<FrameRow>,
    #[serde(default)]
    pub queens: Vec<Queen>,
    #[serde(default)]
    pub cycles: Vec<CycleRow>,
    #[serde(default)]
    pub tasks: Vec<CycleTask>,
}

impl StoreData {
    fn has_frame(&self, id: FrameId) -> bool {
        self.frames.iter().any(|f| f.id == id)
    }

    fn tasks_of(&self, cycle_id: CycleId) -> Vec<CycleTask> {
        let mut tasks: Vec<CycleTask> = self
            .tasks
            .iter()
            .filter(|t| t.cycle_id == cycle_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.day_offset, t.kind.catalog_index()));
        tasks
    }

    fn nest_cycle(&self, row: &CycleRow) -> BreedingCycle {
        BreedingCycle {
            id: row.id,
            frame_id: row.frame_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status,
            tasks: self.tasks_of(row.id),
        }
    }

    fn nest_frame(&self, row: &FrameRow) -> BreedingFrame {
        let queens = self
            .queens
            .iter()
            .filter(|q| q.frame_id == Some(row.id))
            .cloned()
            .collect();

        // Latest cycle first.
        let mut cycle_rows: Vec<&CycleRow> = self
            .cycles
            .iter()
            .filter(|c| c.frame_id == Some(row.id))
            .collect();
        cycle_rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));

        BreedingFrame {
            id: row.id,
            reference: row.reference.clone(),
            created_on: row.created_on,
            cell_count: row.cell_count,
            note: row.note.clone(),
            queens,
            cycles: cycle_rows.into_iter().map(|c| self.nest_cycle(c)).collect(),
        }
    }

    fn frames(&self) -> Vec<BreedingFrame> {
        let mut rows: Vec<&FrameRow> = self.frames.iter().collect();
        rows.sort_by(|a, b| {
            a.created_on
                .cmp(&b.created_on)
                .then_with(|| a.reference.cmp(&b.reference))
        });
        rows.into_iter().map(|r| self.nest_frame(r)).collect()
    }

    fn overview(&self) -> Vec<TaskOverviewEntry> {
        let mut entries: Vec<TaskOverviewEntry> = self
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Cancelled)
            .filter_map(|task| {
                let cycle = self.cycles.iter().find(|c| c.id == task.cycle_id)?;
                let queen_statuses = match cycle.frame_id {
                    Some(frame_id) => self
                        .queens
                        .iter()
                        .filter(|q| q.frame_id == Some(frame_id))
                        .map(|q| q.status)
                        .collect(),
                    None => Vec::new(),
                };
                Some(TaskOverviewEntry {
                    task: task.clone(),
                    cycle: self.nest_cycle(cycle).cycle_ref(),
                    queen_statuses,
                })
            })
            .collect();

        entries.sort_by_key(|e| {
            (
                e.expected_date(),
                e.task.day_offset,
                e.task.kind.catalog_index(),
            )
        });
        entries
    }
}

/// Cheap to clone; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: StoreData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Copy of the current tables.
    pub fn data(&self) -> StoreResult<StoreData> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn with_data<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreData) -> StoreResult<T>,
    {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    fn ready<T: Send + 'static>(result: StoreResult<T>) -> StoreFuture<'static, T> {
        Box::pin(future::ready(result))
    }
}

impl CycleStore for MemoryStore {
    fn load_frames(&self) -> StoreFuture<'_, Vec<BreedingFrame>> {
        Self::ready(self.with_data(|d| Ok(d.frames())))
    }

    fn load_pending_task_overview(&self) -> StoreFuture<'_, Vec<TaskOverviewEntry>> {
        Self::ready(self.with_data(|d| Ok(d.overview())))
    }

    fn update_task(&self, id: TaskId, change: TaskChange) -> StoreFuture<'_, CycleTask> {
        Self::ready(self.with_data(|d| {
            let task = d
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::NotFound {
                    kind: EntityKind::Task,
                    id,
                })?;

            if let Some(status) = change.status {
                task.status = status;
            }
            if let Some(date) = change.completed_on {
                task.completed_on = Some(date);
            }
            if let Some(note) = change.note {
                task.note = note;
            }
            debug!(task = %id, status = %task.status, "memory store: task updated");
            Ok(task.clone())
        }))
    }

    fn update_cycle(&self, id: CycleId, change: CycleChange) -> StoreFuture<'_, BreedingCycle> {
        Self::ready(self.with_data(|d| {
            let row = d
                .cycles
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::NotFound {
                    kind: EntityKind::Cycle,
                    id,
                })?;

            if let Some(status) = change.status {
                row.status = status;
            }
            if let Some(date) = change.end_date {
                row.end_date = Some(date);
            }
            let row = row.clone();
            debug!(cycle = %id, status = %row.status, "memory store: cycle updated");
            Ok(d.nest_cycle(&row))
        }))
    }

    fn update_queens_by_frame(
        &self,
        frame_id: FrameId,
        status: QueenStatus,
    ) -> StoreFuture<'_, Vec<Queen>> {
        Self::ready(self.with_data(|d| {
            if !d.has_frame(frame_id) {
                return Err(StoreError::NotFound {
                    kind: EntityKind::Frame,
                    id: frame_id,
                });
            }

            let affected: Vec<Queen> = d
                .queens
                .iter_mut()
                .filter(|q| q.frame_id == Some(frame_id))
                .map(|q| {
                    q.status = status;
                    q.clone()
                })
                .collect();
            debug!(
                frame = %frame_id,
                %status,
                affected = affected.len(),
                "memory store: queens updated by frame"
            );
            Ok(affected)
        }))
    }

    fn update_queen(&self, id: QueenId, change: QueenChange) -> StoreFuture<'_, Queen> {
        Self::ready(self.with_data(|d| {
            let queen = d
                .queens
                .iter_mut()
                .find(|q| q.id == id)
                .ok_or(StoreError::NotFound {
                    kind: EntityKind::Queen,
                    id,
                })?;

            if let Some(status) = change.status {
                queen.status = status;
            }
            if let Some(color) = change.color {
                queen.color = color;
            }
            if let Some(note) = change.note {
                queen.note = note;
            }
            Ok(queen.clone())
        }))
    }

    fn insert_frame(&self, frame: BreedingFrame) -> StoreFuture<'_, BreedingFrame> {
        Self::ready(self.with_data(|d| {
            if d.has_frame(frame.id) {
                return Err(StoreError::Rejected(format!(
                    "frame {} already exists",
                    frame.id
                )));
            }
            let row = FrameRow {
                id: frame.id,
                reference: frame.reference,
                created_on: frame.created_on,
                cell_count: frame.cell_count,
                note: frame.note,
            };
            let nested = d.nest_frame(&row);
            d.frames.push(row);
            Ok(nested)
        }))
    }

    fn insert_queens(&self, queens: Vec<Queen>) -> StoreFuture<'_, Vec<Queen>> {
        Self::ready(self.with_data(|d| {
            for queen in &queens {
                if d.queens.iter().any(|q| q.id == queen.id) {
                    return Err(StoreError::Rejected(format!(
                        "queen {} already exists",
                        queen.id
                    )));
                }
                if let Some(frame_id) = queen.frame_id {
                    if !d.has_frame(frame_id) {
                        return Err(StoreError::NotFound {
                            kind: EntityKind::Frame,
                            id: frame_id,
                        });
                    }
                }
            }
            d.queens.extend(queens.iter().cloned());
            Ok(queens)
        }))
    }

    fn insert_cycle(&self, cycle: BreedingCycle) -> StoreFuture<'_, BreedingCycle> {
        Self::ready(self.with_data(|d| {
            if let Some(frame_id) = cycle.frame_id {
                if !d.has_frame(frame_id) {
                    return Err(StoreError::NotFound {
                        kind: EntityKind::Frame,
                        id: frame_id,
                    });
                }
            }
            if d.cycles.iter().any(|c| c.id == cycle.id) {
                return Err(StoreError::Rejected(format!(
                    "cycle {} already exists",
                    cycle.id
                )));
            }
            if let Some(bad) = cycle.tasks.iter().find(|t| t.cycle_id != cycle.id) {
                return Err(StoreError::Rejected(format!(
                    "task {} does not belong to cycle {}",
                    bad.id, cycle.id
                )));
            }

            let row = CycleRow {
                id: cycle.id,
                frame_id: cycle.frame_id,
                start_date: cycle.start_date,
                end_date: cycle.end_date,
                status: cycle.status,
            };
            d.cycles.push(row.clone());
            d.tasks.extend(cycle.tasks);
            Ok(d.nest_cycle(&row))
        }))
    }

    fn delete_frame_cascade(&self, frame_id: FrameId) -> StoreFuture<'_, FrameDeletion> {
        Self::ready(self.with_data(|d| {
            if !d.has_frame(frame_id) {
                return Err(StoreError::NotFound {
                    kind: EntityKind::Frame,
                    id: frame_id,
                });
            }

            let cycle_ids: Vec<CycleId> = d
                .cycles
                .iter()
                .filter(|c| c.frame_id == Some(frame_id))
                .map(|c| c.id)
                .collect();

            let tasks_before = d.tasks.len();
            d.tasks.retain(|t| !cycle_ids.contains(&t.cycle_id));
            let tasks_removed = tasks_before - d.tasks.len();

            d.cycles.retain(|c| c.frame_id != Some(frame_id));

            let mut queens_detached = 0;
            for queen in d.queens.iter_mut().filter(|q| q.frame_id == Some(frame_id)) {
                queen.frame_id = None;
                queens_detached += 1;
            }

            d.frames.retain(|f| f.id != frame_id);

            Ok(FrameDeletion {
                cycles_removed: cycle_ids.len(),
                tasks_removed,
                queens_detached,
            })
        }))
    }
}
