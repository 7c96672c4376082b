// src/gating/overview.rs

//! Gate computation over the flat task overview, where tasks of many cycles
//! are interleaved by expected date.

use std::collections::{BTreeMap, HashMap};

use crate::gating::gate::Gate;
use crate::gating::sequence::actionability;
use crate::model::{CycleTask, TaskOverviewEntry};
use crate::types::{CycleId, TaskId};

pub type GateMap = HashMap<TaskId, Gate>;

/// Group overview rows by cycle and gate each group independently.
pub fn overview_gates(entries: &[TaskOverviewEntry]) -> GateMap {
    let mut by_cycle: BTreeMap<CycleId, Vec<&CycleTask>> = BTreeMap::new();
    for entry in entries {
        by_cycle.entry(entry.cycle.id).or_default().push(&entry.task);
    }

    by_cycle
        .into_values()
        .flat_map(actionability)
        .map(|g| (g.task_id, g.gate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CycleRef;
    use crate::types::{CycleStatus, StepKind, TaskStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(cycle: &CycleRef, kind: StepKind, status: TaskStatus) -> TaskOverviewEntry {
        TaskOverviewEntry {
            task: CycleTask {
                id: Uuid::new_v4(),
                cycle_id: cycle.id,
                kind,
                day_offset: kind.day_offset(),
                completed_on: None,
                status,
                note: String::new(),
            },
            cycle: cycle.clone(),
            queen_statuses: vec![],
        }
    }

    fn cycle_ref(start: NaiveDate) -> CycleRef {
        CycleRef {
            id: Uuid::new_v4(),
            status: CycleStatus::InProgress,
            start_date: start,
            frame_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn each_cycle_gets_its_own_actionable_task() {
        let a = cycle_ref(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        let b = cycle_ref(NaiveDate::from_ymd_opt(2026, 5, 3).unwrap());

        let entries = vec![
            entry(&a, StepKind::Grafting, TaskStatus::Done),
            entry(&b, StepKind::Grafting, TaskStatus::Pending),
            entry(&a, StepKind::Capping, TaskStatus::Pending),
            entry(&b, StepKind::Capping, TaskStatus::Pending),
            entry(&a, StepKind::QueenEmergence, TaskStatus::Pending),
        ];

        let gates = overview_gates(&entries);
        assert_eq!(gates[&entries[0].task.id], Gate::Terminal);
        assert_eq!(gates[&entries[1].task.id], Gate::Actionable);
        assert_eq!(gates[&entries[2].task.id], Gate::Actionable);
        assert_eq!(gates[&entries[3].task.id], Gate::Locked);
        assert_eq!(gates[&entries[4].task.id], Gate::Locked);
    }
}
