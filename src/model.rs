// src/model.rs

//! Data model for frames, queens, cycles and tasks, plus the partial-update
//! payloads accepted by the store.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{
    CycleId, CycleStatus, FrameId, QueenId, QueenStatus, StepKind, TaskId, TaskStatus,
};

/// A grafting bar ("racle"). Owns its queens and cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingFrame {
    pub id: FrameId,
    pub reference: String,
    pub created_on: NaiveDate,
    /// Number of queen cells on the bar; caps how many queens it can hold.
    pub cell_count: u32,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub queens: Vec<Queen>,
    #[serde(default)]
    pub cycles: Vec<BreedingCycle>,
}

impl BreedingFrame {
    pub fn is_full(&self) -> bool {
        self.queens.len() >= self.cell_count as usize
    }

    /// The cycle currently in progress, if any.
    pub fn active_cycle(&self) -> Option<&BreedingCycle> {
        self.cycles
            .iter()
            .find(|c| c.status == CycleStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queen {
    pub id: QueenId,
    pub birth_year: i32,
    pub color: String,
    pub lineage: String,
    /// 1..=10
    pub sweetness: u8,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub non_reproducible: bool,
    pub status: QueenStatus,
    /// Owning frame while the queen is in the rearing workflow.
    #[serde(default)]
    pub frame_id: Option<FrameId>,
}

impl Queen {
    /// Whether the queen is still in the rearing workflow. Derived from the
    /// frame reference so the two can never disagree.
    pub fn is_rearing(&self) -> bool {
        self.frame_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingCycle {
    pub id: CycleId,
    pub frame_id: Option<FrameId>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: CycleStatus,
    /// Ordered by day offset ascending when read from the store.
    #[serde(default)]
    pub tasks: Vec<CycleTask>,
}

impl BreedingCycle {
    pub fn expected_date_of(&self, task: &CycleTask) -> NaiveDate {
        task.expected_date(self.start_date)
    }

    pub fn done_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count()
    }

    pub fn cycle_ref(&self) -> CycleRef {
        CycleRef {
            id: self.id,
            status: self.status,
            start_date: self.start_date,
            frame_id: self.frame_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTask {
    pub id: TaskId,
    pub cycle_id: CycleId,
    pub kind: StepKind,
    /// Theoretical day offset ("jourTheorique"). Authoritative for ordering.
    pub day_offset: u32,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
    pub status: TaskStatus,
    #[serde(default)]
    pub note: String,
}

impl CycleTask {
    /// Saturates at `NaiveDate::MAX` for starts near the end of the calendar.
    pub fn expected_date(&self, cycle_start: NaiveDate) -> NaiveDate {
        cycle_start
            .checked_add_days(Days::new(u64::from(self.day_offset)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Back-reference from an overview task to its cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRef {
    pub id: CycleId,
    pub status: CycleStatus,
    pub start_date: NaiveDate,
    pub frame_id: Option<FrameId>,
}

/// One row of the cross-cycle task overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOverviewEntry {
    pub task: CycleTask,
    pub cycle: CycleRef,
    /// Statuses of the queens of the cycle's frame at read time.
    #[serde(default)]
    pub queen_statuses: Vec<QueenStatus>,
}

impl TaskOverviewEntry {
    pub fn expected_date(&self) -> NaiveDate {
        self.task.expected_date(self.cycle.start_date)
    }
}

/// Partial update of a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChange {
    pub status: Option<TaskStatus>,
    pub completed_on: Option<NaiveDate>,
    pub note: Option<String>,
}

impl TaskChange {
    pub fn done_on(date: NaiveDate) -> Self {
        Self {
            status: Some(TaskStatus::Done),
            completed_on: Some(date),
            note: None,
        }
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Partial update of a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleChange {
    pub status: Option<CycleStatus>,
    pub end_date: Option<NaiveDate>,
}

/// Partial update of a queen (direct edit).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueenChange {
    pub status: Option<QueenStatus>,
    pub color: Option<String>,
    pub note: Option<String>,
}

/// What a cascading frame delete touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameDeletion {
    pub cycles_removed: usize,
    pub tasks_removed: usize,
    pub queens_detached: usize,
}

/// A task located inside a snapshot, together with its owners.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub frame: &'a BreedingFrame,
    pub cycle: &'a BreedingCycle,
    pub task: &'a CycleTask,
}

/// Everything read from the store in one `load_frames` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RearingSnapshot {
    pub frames: Vec<BreedingFrame>,
}

impl RearingSnapshot {
    pub fn new(frames: Vec<BreedingFrame>) -> Self {
        Self { frames }
    }

    pub fn frame(&self, id: FrameId) -> Option<&BreedingFrame> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn cycle(&self, id: CycleId) -> Option<(&BreedingFrame, &BreedingCycle)> {
        self.frames.iter().find_map(|frame| {
            frame
                .cycles
                .iter()
                .find(|c| c.id == id)
                .map(|cycle| (frame, cycle))
        })
    }

    pub fn task(&self, id: TaskId) -> Option<TaskContext<'_>> {
        self.frames.iter().find_map(|frame| {
            frame.cycles.iter().find_map(|cycle| {
                cycle
                    .tasks
                    .iter()
                    .find(|t| t.id == id)
                    .map(|task| TaskContext { frame, cycle, task })
            })
        })
    }

    pub fn queen(&self, id: QueenId) -> Option<&Queen> {
        self.frames
            .iter()
            .flat_map(|f| f.queens.iter())
            .find(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(cycle_id: CycleId, kind: StepKind) -> CycleTask {
        CycleTask {
            id: Uuid::new_v4(),
            cycle_id,
            kind,
            day_offset: kind.day_offset(),
            completed_on: None,
            status: TaskStatus::Pending,
            note: String::new(),
        }
    }

    #[test]
    fn expected_date_is_start_plus_offset() {
        let cycle_id = Uuid::new_v4();
        let t = task(cycle_id, StepKind::ReadyForSale);
        assert_eq!(t.expected_date(date(2026, 4, 1)), date(2026, 4, 29));
    }

    #[test]
    fn expected_date_saturates_at_calendar_end() {
        let t = task(Uuid::new_v4(), StepKind::ReadyForSale);
        let start = NaiveDate::MAX.checked_sub_days(Days::new(3)).unwrap();
        assert_eq!(t.expected_date(start), NaiveDate::MAX);
        assert_eq!(task(Uuid::new_v4(), StepKind::Grafting).expected_date(start), start);
    }

    #[test]
    fn queen_rearing_flag_follows_frame_reference() {
        let mut queen = Queen {
            id: Uuid::new_v4(),
            birth_year: 2026,
            color: "Blanc".into(),
            lineage: "Buckfast".into(),
            sweetness: 5,
            note: String::new(),
            non_reproducible: false,
            status: QueenStatus::NonFecondee,
            frame_id: Some(Uuid::new_v4()),
        };
        assert!(queen.is_rearing());
        queen.frame_id = None;
        assert!(!queen.is_rearing());
    }

    #[test]
    fn snapshot_locates_task_with_owners() {
        let frame_id = Uuid::new_v4();
        let cycle_id = Uuid::new_v4();
        let t = task(cycle_id, StepKind::Capping);
        let task_id = t.id;
        let frame = BreedingFrame {
            id: frame_id,
            reference: "R-1".into(),
            created_on: date(2026, 4, 1),
            cell_count: 2,
            note: String::new(),
            queens: vec![],
            cycles: vec![BreedingCycle {
                id: cycle_id,
                frame_id: Some(frame_id),
                start_date: date(2026, 4, 1),
                end_date: None,
                status: CycleStatus::InProgress,
                tasks: vec![t],
            }],
        };
        let snapshot = RearingSnapshot::new(vec![frame]);

        let ctx = snapshot.task(task_id).unwrap();
        assert_eq!(ctx.frame.id, frame_id);
        assert_eq!(ctx.cycle.id, cycle_id);
        assert_eq!(ctx.task.kind, StepKind::Capping);
        assert!(snapshot.task(Uuid::new_v4()).is_none());
        assert!(snapshot.frame(frame_id).unwrap().active_cycle().is_some());
    }
}
