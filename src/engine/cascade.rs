// src/engine/cascade.rs

//! Queen-status side effects of completing a step.

use uuid::Uuid;

use crate::engine::core::StoreWrite;
use crate::types::{QueenStatus, StepKind};

/// Queen status written to every queen of the frame when `kind` is
/// completed. Steps without an entry have no side effect.
pub fn cascade_status_for(kind: StepKind) -> Option<QueenStatus> {
    match kind {
        StepKind::LayingValidation => Some(QueenStatus::Fecondee),
        StepKind::ReadyForSale => Some(QueenStatus::DisponibleVente),
        StepKind::Grafting
        | StepKind::Capping
        | StepKind::QueenEmergence
        | StepKind::MatingFlightCheck
        | StepKind::QueenMarking => None,
    }
}

/// Dependent writes that still have to be applied after a primary write
/// succeeded. Every write in here is idempotent, so the whole list can be
/// replayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCascade {
    /// Entity whose primary write already went through (task or cycle id).
    pub origin: Uuid,
    pub writes: Vec<StoreWrite>,
}

impl PendingCascade {
    pub fn new(origin: Uuid, writes: Vec<StoreWrite>) -> Self {
        Self { origin, writes }
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Remaining writes starting at the one that failed.
    pub(crate) fn remaining_from(&self, index: usize) -> Self {
        Self {
            origin: self.origin,
            writes: self.writes[index..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_laying_validation_and_sale_cascade() {
        let mapped: Vec<(StepKind, QueenStatus)> = StepKind::ALL
            .iter()
            .filter_map(|k| cascade_status_for(*k).map(|s| (*k, s)))
            .collect();

        assert_eq!(
            mapped,
            vec![
                (StepKind::LayingValidation, QueenStatus::Fecondee),
                (StepKind::ReadyForSale, QueenStatus::DisponibleVente),
            ]
        );
    }

    #[test]
    fn remaining_from_keeps_the_failed_write() {
        let frame_id = Uuid::new_v4();
        let pending = PendingCascade::new(
            Uuid::new_v4(),
            vec![
                StoreWrite::UpdateQueensByFrame {
                    frame_id,
                    status: QueenStatus::Fecondee,
                },
                StoreWrite::UpdateQueensByFrame {
                    frame_id,
                    status: QueenStatus::DisponibleVente,
                },
            ],
        );

        let rest = pending.remaining_from(1);
        assert_eq!(rest.origin, pending.origin);
        assert_eq!(rest.writes, pending.writes[1..].to_vec());
        assert!(pending.remaining_from(2).is_empty());
    }
}
