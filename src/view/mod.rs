// src/view/mod.rs

//! Read model for the dashboard.
//!
//! A [`Dashboard`] is a pure projection of one `load_frames` result plus one
//! task overview. It keeps no state of its own; after a mutation the caller
//! builds a new one from a fresh read.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::catalog::{task_status_label, queen_status_label};
use crate::gating::{Gate, overview_gates};
use crate::model::{BreedingFrame, TaskOverviewEntry};
use crate::types::{CycleId, CycleStatus, FrameId, QueenStatus, StepKind, TaskId, TaskStatus};

pub mod cards;

pub use cards::{FrameCard, NextTask};

/// One overview row, annotated with its gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEntry {
    pub task_id: TaskId,
    pub kind: StepKind,
    pub cycle_id: CycleId,
    pub frame_id: Option<FrameId>,
    pub expected_date: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    pub status: TaskStatus,
    pub gate: Gate,
    pub queen_statuses: Vec<QueenStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub frames: usize,
    pub queens: usize,
    pub cycles_in_progress: usize,
    pub overdue_tasks: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub pending: Vec<DashboardEntry>,
    pub done: Vec<DashboardEntry>,
    pub overdue: Vec<DashboardEntry>,
    pub counts: DashboardCounts,
    /// Pending task with the earliest expected date.
    pub next_pending: Option<DashboardEntry>,
    pub frames: Vec<FrameCard>,
}

impl Dashboard {
    pub fn build(frames: &[BreedingFrame], overview: &[TaskOverviewEntry]) -> Self {
        let gates = overview_gates(overview);

        let mut dashboard = Dashboard::default();
        for row in overview {
            let entry = DashboardEntry {
                task_id: row.task.id,
                kind: row.task.kind,
                cycle_id: row.cycle.id,
                frame_id: row.cycle.frame_id,
                expected_date: row.expected_date(),
                completed_on: row.task.completed_on,
                status: row.task.status,
                gate: gates.get(&row.task.id).copied().unwrap_or(Gate::Locked),
                queen_statuses: row.queen_statuses.clone(),
            };
            match entry.status {
                TaskStatus::Pending => dashboard.pending.push(entry),
                TaskStatus::Done => dashboard.done.push(entry),
                TaskStatus::Overdue => dashboard.overdue.push(entry),
                // The overview never carries cancelled tasks.
                TaskStatus::Cancelled => {}
            }
        }

        for group in [&mut dashboard.pending, &mut dashboard.done, &mut dashboard.overdue] {
            group.sort_by_key(|e| (e.expected_date, e.kind.catalog_index()));
        }

        dashboard.next_pending = dashboard.pending.first().cloned();

        let queens: HashSet<_> = frames
            .iter()
            .flat_map(|f| f.queens.iter().map(|q| q.id))
            .collect();
        dashboard.counts = DashboardCounts {
            frames: frames.len(),
            queens: queens.len(),
            cycles_in_progress: frames
                .iter()
                .flat_map(|f| f.cycles.iter())
                .filter(|c| c.status == CycleStatus::InProgress)
                .count(),
            overdue_tasks: dashboard.overdue.len(),
        };

        dashboard.frames = frames.iter().map(FrameCard::from_frame).collect();
        dashboard
    }

    /// Tasks that can be completed right now, earliest first.
    pub fn actionable(&self) -> impl Iterator<Item = &DashboardEntry> {
        let mut entries: Vec<&DashboardEntry> = self
            .overdue
            .iter()
            .chain(self.pending.iter())
            .filter(|e| e.gate.is_actionable())
            .collect();
        entries.sort_by_key(|e| e.expected_date);
        entries.into_iter()
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(
            f,
            "frames: {}  queens: {}  cycles in progress: {}  overdue: {}",
            c.frames, c.queens, c.cycles_in_progress, c.overdue_tasks
        )?;

        if let Some(next) = &self.next_pending {
            writeln!(f, "next: {} on {} ({})", next.kind.label(), next.expected_date, next.task_id)?;
        }

        for card in &self.frames {
            writeln!(f)?;
            write!(f, "{card}")?;
        }

        for (title, group) in [
            ("overdue", &self.overdue),
            ("pending", &self.pending),
            ("done", &self.done),
        ] {
            if group.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{title}:")?;
            for entry in group {
                let marker = match entry.gate {
                    Gate::Actionable => "*",
                    Gate::Locked => "-",
                    Gate::Terminal => " ",
                };
                write!(
                    f,
                    "  {marker} {}  {:<32} {:<10} {}",
                    entry.expected_date,
                    entry.kind.label(),
                    task_status_label(entry.status),
                    entry.task_id
                )?;
                if let Some(status) = entry.queen_statuses.first() {
                    write!(f, "  [{}]", queen_status_label(*status))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BreedingCycle, CycleTask, Queen};
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn frame_with_cycle(statuses: [TaskStatus; 7], queens: usize) -> BreedingFrame {
        let frame_id = Uuid::new_v4();
        let cycle_id = Uuid::new_v4();
        let tasks = StepKind::ALL
            .iter()
            .zip(statuses)
            .map(|(kind, status)| CycleTask {
                id: Uuid::new_v4(),
                cycle_id,
                kind: *kind,
                day_offset: kind.day_offset(),
                completed_on: None,
                status,
                note: String::new(),
            })
            .collect();
        BreedingFrame {
            id: frame_id,
            reference: "R-1".into(),
            created_on: date(1),
            cell_count: 4,
            note: String::new(),
            queens: (0..queens)
                .map(|_| Queen {
                    id: Uuid::new_v4(),
                    birth_year: 2026,
                    color: "Blanc".into(),
                    lineage: "Buckfast".into(),
                    sweetness: 5,
                    note: String::new(),
                    non_reproducible: false,
                    status: QueenStatus::NonFecondee,
                    frame_id: Some(frame_id),
                })
                .collect(),
            cycles: vec![BreedingCycle {
                id: cycle_id,
                frame_id: Some(frame_id),
                start_date: date(1),
                end_date: None,
                status: CycleStatus::InProgress,
                tasks,
            }],
        }
    }

    fn overview_of(frame: &BreedingFrame) -> Vec<TaskOverviewEntry> {
        frame
            .cycles
            .iter()
            .flat_map(|cycle| {
                cycle
                    .tasks
                    .iter()
                    .filter(|t| t.status != TaskStatus::Cancelled)
                    .map(|t| TaskOverviewEntry {
                        task: t.clone(),
                        cycle: cycle.cycle_ref(),
                        queen_statuses: frame.queens.iter().map(|q| q.status).collect(),
                    })
            })
            .collect()
    }

    #[test]
    fn groups_tasks_and_counts() {
        use TaskStatus::*;
        let frame = frame_with_cycle([Done, Done, Overdue, Pending, Pending, Pending, Cancelled], 3);
        let overview = overview_of(&frame);

        let dashboard = Dashboard::build(std::slice::from_ref(&frame), &overview);

        assert_eq!(dashboard.done.len(), 2);
        assert_eq!(dashboard.overdue.len(), 1);
        assert_eq!(dashboard.pending.len(), 3);
        assert_eq!(
            dashboard.counts,
            DashboardCounts {
                frames: 1,
                queens: 3,
                cycles_in_progress: 1,
                overdue_tasks: 1,
            }
        );
    }

    #[test]
    fn overdue_task_is_the_actionable_one() {
        use TaskStatus::*;
        let frame = frame_with_cycle([Done, Done, Overdue, Pending, Pending, Pending, Pending], 0);
        let dashboard = Dashboard::build(std::slice::from_ref(&frame), &overview_of(&frame));

        assert_eq!(dashboard.overdue[0].gate, Gate::Actionable);
        assert!(dashboard.pending.iter().all(|e| e.gate == Gate::Locked));
        assert!(dashboard.done.iter().all(|e| e.gate == Gate::Terminal));

        let actionable: Vec<_> = dashboard.actionable().collect();
        assert_eq!(actionable.len(), 1);
        assert_eq!(actionable[0].kind, StepKind::QueenEmergence);
    }

    #[test]
    fn next_pending_is_earliest_expected_date() {
        use TaskStatus::*;
        let frame = frame_with_cycle([Done, Pending, Pending, Pending, Pending, Pending, Pending], 1);
        let dashboard = Dashboard::build(std::slice::from_ref(&frame), &overview_of(&frame));

        let next = dashboard.next_pending.unwrap();
        assert_eq!(next.kind, StepKind::Capping);
        assert_eq!(next.expected_date, date(7));
    }

    #[test]
    fn empty_store_gives_empty_dashboard() {
        let dashboard = Dashboard::build(&[], &[]);
        assert_eq!(dashboard, Dashboard::default());
        assert!(dashboard.to_string().starts_with("frames: 0"));
    }
}
