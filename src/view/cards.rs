// src/view/cards.rs

use std::fmt;

use chrono::NaiveDate;

use crate::catalog::cycle_status_label;
use crate::gating::next_actionable;
use crate::model::BreedingFrame;
use crate::types::{CycleId, CycleStatus, FrameId, StepKind, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTask {
    pub task_id: TaskId,
    pub kind: StepKind,
    pub expected_date: NaiveDate,
}

/// Per-frame summary: occupancy and progress of the active cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCard {
    pub frame_id: FrameId,
    pub reference: String,
    pub queens: usize,
    pub cells: u32,
    pub is_full: bool,
    pub active_cycle: Option<CycleId>,
    /// Done tasks over total tasks of the active cycle.
    pub progress: Option<(usize, usize)>,
    pub next_task: Option<NextTask>,
    /// Status of the most recent cycle, active or not.
    pub last_cycle_status: Option<CycleStatus>,
}

impl FrameCard {
    pub fn from_frame(frame: &BreedingFrame) -> Self {
        let active = frame.active_cycle();

        Self {
            frame_id: frame.id,
            reference: frame.reference.clone(),
            queens: frame.queens.len(),
            cells: frame.cell_count,
            is_full: frame.is_full(),
            active_cycle: active.map(|c| c.id),
            progress: active.map(|c| (c.done_count(), c.tasks.len())),
            next_task: active.and_then(|c| {
                next_actionable(&c.tasks).map(|t| NextTask {
                    task_id: t.id,
                    kind: t.kind,
                    expected_date: c.expected_date_of(t),
                })
            }),
            last_cycle_status: frame
                .cycles
                .iter()
                .max_by_key(|c| c.start_date)
                .map(|c| c.status),
        }
    }
}

impl fmt::Display for FrameCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})  queens {}/{}",
            self.reference, self.frame_id, self.queens, self.cells
        )?;
        if self.is_full {
            write!(f, " full")?;
        }
        writeln!(f)?;

        match (self.active_cycle, self.progress) {
            (Some(cycle), Some((done, total))) => {
                writeln!(f, "  cycle {cycle}: {done}/{total} done")?;
                if let Some(next) = &self.next_task {
                    writeln!(
                        f,
                        "  next: {} on {} ({})",
                        next.kind.label(),
                        next.expected_date,
                        next.task_id
                    )?;
                }
            }
            _ => match self.last_cycle_status {
                Some(status) => writeln!(f, "  last cycle: {}", cycle_status_label(status))?,
                None => writeln!(f, "  no cycle yet")?,
            },
        }
        Ok(())
    }
}
