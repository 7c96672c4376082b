#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use queen_rearing::catalog::step_kinds;
use queen_rearing::model::{CycleTask, Queen};
use queen_rearing::store::MemoryStore;
use queen_rearing::store::memory::{CycleRow, FrameRow, StoreData};
use queen_rearing::types::{
    CycleId, CycleStatus, FrameId, QueenStatus, StepKind, TaskId, TaskStatus,
};

/// Shorthand for a valid calendar date.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Builder for one cycle with the seven catalog tasks, all Pending.
#[derive(Debug, Clone)]
pub struct CycleBuilder {
    row: CycleRow,
    tasks: Vec<CycleTask>,
}

impl CycleBuilder {
    pub fn new(start_date: NaiveDate) -> Self {
        let id = Uuid::new_v4();
        let tasks = step_kinds()
            .iter()
            .map(|step| CycleTask {
                id: Uuid::new_v4(),
                cycle_id: id,
                kind: step.kind,
                day_offset: step.day_offset,
                completed_on: None,
                status: TaskStatus::Pending,
                note: String::new(),
            })
            .collect();

        Self {
            row: CycleRow {
                id,
                frame_id: None,
                start_date,
                end_date: None,
                status: CycleStatus::InProgress,
            },
            tasks,
        }
    }

    pub fn id(&self) -> CycleId {
        self.row.id
    }

    pub fn task_id(&self, kind: StepKind) -> TaskId {
        self.tasks
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.id)
            .expect("every cycle has one task per kind")
    }

    pub fn status(mut self, status: CycleStatus) -> Self {
        self.row.status = status;
        self
    }

    pub fn task_status(mut self, kind: StepKind, status: TaskStatus) -> Self {
        let start = self.row.start_date;
        for task in self.tasks.iter_mut().filter(|t| t.kind == kind) {
            let expected = task.expected_date(start);
            task.status = status;
            task.completed_on = (status == TaskStatus::Done).then_some(expected);
        }
        self
    }

    /// Mark every step up to and including `last` as Done.
    pub fn done_through(mut self, last: StepKind) -> Self {
        for kind in StepKind::ALL {
            self = self.task_status(kind, TaskStatus::Done);
            if kind == last {
                break;
            }
        }
        self
    }

    /// Override the day offset of one task.
    pub fn offset(mut self, kind: StepKind, day_offset: u32) -> Self {
        for task in self.tasks.iter_mut().filter(|t| t.kind == kind) {
            task.day_offset = day_offset;
        }
        self
    }
}

/// Builder for one frame with its queens and cycles.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    row: FrameRow,
    queens: Vec<Queen>,
    cycles: Vec<CycleBuilder>,
}

impl FrameBuilder {
    pub fn new(reference: &str) -> Self {
        Self {
            row: FrameRow {
                id: Uuid::new_v4(),
                reference: reference.to_string(),
                created_on: date(2026, 4, 1),
                cell_count: 10,
                note: String::new(),
            },
            queens: Vec::new(),
            cycles: Vec::new(),
        }
    }

    pub fn id(&self) -> FrameId {
        self.row.id
    }

    pub fn cells(mut self, cell_count: u32) -> Self {
        self.row.cell_count = cell_count;
        self
    }

    pub fn created_on(mut self, created_on: NaiveDate) -> Self {
        self.row.created_on = created_on;
        self
    }

    /// Add `count` queens with the given status.
    pub fn queens(mut self, count: usize, status: QueenStatus) -> Self {
        let frame_id = self.row.id;
        self.queens.extend((0..count).map(|_| Queen {
            id: Uuid::new_v4(),
            birth_year: 2026,
            color: "Blanc".to_string(),
            lineage: "Buckfast".to_string(),
            sweetness: 5,
            note: String::new(),
            non_reproducible: false,
            status,
            frame_id: Some(frame_id),
        }));
        self
    }

    pub fn cycle(mut self, cycle: CycleBuilder) -> Self {
        self.cycles.push(cycle);
        self
    }
}

/// Collects frames (and orphan rows) into a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    data: StoreData,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(mut self, frame: FrameBuilder) -> Self {
        let frame_id = frame.row.id;
        self.data.frames.push(frame.row);
        self.data.queens.extend(frame.queens);
        for cycle in frame.cycles {
            self.push_cycle(cycle, Some(frame_id));
        }
        self
    }

    /// A cycle with no frame reference.
    pub fn orphan_cycle(mut self, cycle: CycleBuilder) -> Self {
        self.push_cycle(cycle, None);
        self
    }

    /// A queen that belongs to no frame.
    pub fn hive_queen(mut self, status: QueenStatus) -> Self {
        self.data.queens.push(Queen {
            id: Uuid::new_v4(),
            birth_year: 2025,
            color: "Bleu".to_string(),
            lineage: "Carnica".to_string(),
            sweetness: 6,
            note: String::new(),
            non_reproducible: false,
            status,
            frame_id: None,
        });
        self
    }

    fn push_cycle(&mut self, cycle: CycleBuilder, frame_id: Option<FrameId>) {
        let mut row = cycle.row;
        row.frame_id = frame_id;
        self.data.cycles.push(row);
        self.data.tasks.extend(cycle.tasks);
    }

    pub fn data(self) -> StoreData {
        self.data
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore::from_data(self.data)
    }
}
