// tests/property_gating.rs

use proptest::prelude::*;
use uuid::Uuid;

use queen_rearing::gating::{Gate, actionability, next_actionable};
use queen_rearing::model::CycleTask;
use queen_rearing::types::{StepKind, TaskStatus};

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::Done),
        Just(TaskStatus::Overdue),
        Just(TaskStatus::Cancelled),
    ]
}

/// One cycle: a status per catalog step, offsets either from the catalog or
/// arbitrary (irregular data, possibly with ties).
fn cycle_strategy() -> impl Strategy<Value = Vec<CycleTask>> {
    (
        proptest::collection::vec(status_strategy(), 7),
        proptest::collection::vec(0u32..40, 7),
        any::<bool>(),
    )
        .prop_map(|(statuses, offsets, irregular)| {
            let cycle_id = Uuid::new_v4();
            StepKind::ALL
                .iter()
                .zip(statuses)
                .zip(offsets)
                .map(|((kind, status), offset)| CycleTask {
                    id: Uuid::new_v4(),
                    cycle_id,
                    kind: *kind,
                    day_offset: if irregular { offset } else { kind.day_offset() },
                    completed_on: None,
                    status,
                    note: String::new(),
                })
                .collect()
        })
}

fn lowest_open(tasks: &[CycleTask]) -> Option<&CycleTask> {
    tasks
        .iter()
        .filter(|t| !t.status.is_terminal())
        .min_by_key(|t| (t.day_offset, t.kind.catalog_index()))
}

proptest! {
    #[test]
    fn at_most_one_actionable_and_it_is_the_lowest_open(tasks in cycle_strategy()) {
        let gates = actionability(&tasks);
        let actionable: Vec<_> = gates.iter().filter(|g| g.gate == Gate::Actionable).collect();

        prop_assert!(actionable.len() <= 1);
        prop_assert_eq!(actionable.first().map(|g| g.task_id), lowest_open(&tasks).map(|t| t.id));
        prop_assert_eq!(next_actionable(&tasks).map(|t| t.id), lowest_open(&tasks).map(|t| t.id));

        for gate in &gates {
            prop_assert_eq!(gate.gate == Gate::Terminal, gate.status.is_terminal());
        }
    }

    #[test]
    fn completing_the_actionable_task_advances_by_one(mut tasks in cycle_strategy()) {
        let Some(current) = next_actionable(&tasks).map(|t| t.id) else {
            return Ok(());
        };
        for task in tasks.iter_mut().filter(|t| t.id == current) {
            task.status = TaskStatus::Done;
        }

        let actionable: Vec<_> = actionability(&tasks)
            .into_iter()
            .filter(|g| g.gate.is_actionable())
            .collect();
        prop_assert!(actionable.len() <= 1);
        prop_assert!(actionable.iter().all(|g| g.task_id != current));
        prop_assert_eq!(actionable.first().map(|g| g.task_id), lowest_open(&tasks).map(|t| t.id));
    }
}
