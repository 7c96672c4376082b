// src/engine/frames.rs

//! Validation and planning for frame and queen creation.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::catalog::marking_color_for_year;
use crate::engine::EngineOptions;
use crate::errors::{EntityKind, RearingError, Result};
use crate::model::{BreedingFrame, Queen, RearingSnapshot};
use crate::types::{FrameId, QueenStatus};

const MAX_REFERENCE_LEN: usize = 100;
const MAX_NOTE_LEN: usize = 500;
const DEFAULT_SWEETNESS: u8 = 5;

/// Queens to create on a new frame, one per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoQueens {
    pub lineage: String,
    /// Defaults to the marking colour of the creation year.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFrame {
    pub reference: String,
    pub created_on: NaiveDate,
    /// Defaults to `EngineOptions::default_cell_count`.
    pub cell_count: Option<u32>,
    pub note: String,
    pub auto_queens: Option<AutoQueens>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQueen {
    pub birth_year: i32,
    pub color: String,
    pub lineage: String,
    pub sweetness: u8,
    pub note: String,
    pub status: QueenStatus,
}

/// Frame row plus the queens to insert after it.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub frame: BreedingFrame,
    pub queens: Vec<Queen>,
}

pub fn plan_new_frame(input: NewFrame, options: &EngineOptions) -> Result<FramePlan> {
    let reference = input.reference.trim().to_string();
    if reference.is_empty() {
        return Err(RearingError::Validation(
            "frame reference is required".to_string(),
        ));
    }
    if reference.chars().count() > MAX_REFERENCE_LEN {
        return Err(RearingError::Validation(format!(
            "frame reference is longer than {MAX_REFERENCE_LEN} characters"
        )));
    }
    if input.note.chars().count() > MAX_NOTE_LEN {
        return Err(RearingError::Validation(format!(
            "frame note is longer than {MAX_NOTE_LEN} characters"
        )));
    }

    let cell_count = input.cell_count.unwrap_or(options.default_cell_count);
    if cell_count == 0 {
        return Err(RearingError::Validation(
            "a frame needs at least one cell".to_string(),
        ));
    }

    let frame_id = Uuid::new_v4();
    let queens = match input.auto_queens {
        Some(auto) => {
            let lineage = auto.lineage.trim().to_string();
            if lineage.is_empty() {
                return Err(RearingError::Validation(
                    "lineage is required to create queens".to_string(),
                ));
            }
            let year = input.created_on.year();
            let color = auto
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| marking_color_for_year(year).to_string());

            (0..cell_count)
                .map(|_| Queen {
                    id: Uuid::new_v4(),
                    birth_year: year,
                    color: color.clone(),
                    lineage: lineage.clone(),
                    sweetness: DEFAULT_SWEETNESS,
                    note: String::new(),
                    non_reproducible: false,
                    status: QueenStatus::NonFecondee,
                    frame_id: Some(frame_id),
                })
                .collect()
        }
        None => Vec::new(),
    };

    Ok(FramePlan {
        frame: BreedingFrame {
            id: frame_id,
            reference,
            created_on: input.created_on,
            cell_count,
            note: input.note,
            queens: Vec::new(),
            cycles: Vec::new(),
        },
        queens,
    })
}

/// Validate a queen for `frame_id` and build it. Rejected when every cell of
/// the frame is taken.
pub fn plan_add_queen(
    snapshot: &RearingSnapshot,
    frame_id: FrameId,
    input: NewQueen,
) -> Result<Queen> {
    let frame = snapshot.frame(frame_id).ok_or(RearingError::NotFound {
        kind: EntityKind::Frame,
        id: frame_id,
    })?;

    if frame.is_full() {
        return Err(RearingError::Validation(format!(
            "frame {} is full ({}/{} cells)",
            frame.reference,
            frame.queens.len(),
            frame.cell_count
        )));
    }
    if !(1900..=2100).contains(&input.birth_year) {
        return Err(RearingError::Validation(format!(
            "birth year {} is out of range",
            input.birth_year
        )));
    }
    if !(1..=10).contains(&input.sweetness) {
        return Err(RearingError::Validation(format!(
            "sweetness must be between 1 and 10 (got {})",
            input.sweetness
        )));
    }
    if input.color.trim().is_empty() || input.lineage.trim().is_empty() {
        return Err(RearingError::Validation(
            "color and lineage are required".to_string(),
        ));
    }

    Ok(Queen {
        id: Uuid::new_v4(),
        birth_year: input.birth_year,
        color: input.color.trim().to_string(),
        lineage: input.lineage.trim().to_string(),
        sweetness: input.sweetness,
        note: input.note,
        non_reproducible: false,
        status: input.status,
        frame_id: Some(frame_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_frame(cells: Option<u32>, auto: Option<AutoQueens>) -> NewFrame {
        NewFrame {
            reference: "  Racle-2026-01 ".into(),
            created_on: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            cell_count: cells,
            note: String::new(),
            auto_queens: auto,
        }
    }

    fn new_queen() -> NewQueen {
        NewQueen {
            birth_year: 2026,
            color: "Blanc".into(),
            lineage: "Buckfast".into(),
            sweetness: 7,
            note: String::new(),
            status: QueenStatus::NonFecondee,
        }
    }

    #[test]
    fn frame_uses_default_cell_count_and_trims_reference() {
        let plan = plan_new_frame(new_frame(None, None), &EngineOptions::default()).unwrap();
        assert_eq!(plan.frame.reference, "Racle-2026-01");
        assert_eq!(plan.frame.cell_count, 20);
        assert!(plan.queens.is_empty());
    }

    #[test]
    fn auto_queens_fill_every_cell_with_year_color() {
        let auto = AutoQueens {
            lineage: "Carnica".into(),
            color: None,
        };
        let plan = plan_new_frame(new_frame(Some(3), Some(auto)), &EngineOptions::default())
            .unwrap();

        assert_eq!(plan.queens.len(), 3);
        assert!(plan.queens.iter().all(|q| {
            q.frame_id == Some(plan.frame.id)
                && q.color == "Blanc"
                && q.status == QueenStatus::NonFecondee
                && q.sweetness == 5
                && q.birth_year == 2026
        }));
    }

    #[test]
    fn invalid_frames_are_rejected() {
        let options = EngineOptions::default();

        let mut input = new_frame(Some(0), None);
        assert!(plan_new_frame(input.clone(), &options).is_err());

        input.cell_count = Some(4);
        input.reference = "   ".into();
        assert!(plan_new_frame(input.clone(), &options).is_err());

        input.reference = "x".repeat(101);
        assert!(plan_new_frame(input, &options).is_err());

        let auto = AutoQueens {
            lineage: " ".into(),
            color: None,
        };
        assert!(plan_new_frame(new_frame(Some(2), Some(auto)), &options).is_err());
    }

    #[test]
    fn full_frame_rejects_new_queen() {
        let options = EngineOptions::default();
        let auto = AutoQueens {
            lineage: "Carnica".into(),
            color: Some("Vert".into()),
        };
        let plan = plan_new_frame(new_frame(Some(1), Some(auto)), &options).unwrap();
        let mut frame = plan.frame.clone();
        frame.queens = plan.queens;
        let snapshot = RearingSnapshot::new(vec![frame]);

        let err = plan_add_queen(&snapshot, plan.frame.id, new_queen()).unwrap_err();
        assert!(matches!(err, RearingError::Validation(ref msg) if msg.contains("full")));
    }

    #[test]
    fn queen_fields_are_validated() {
        let plan = plan_new_frame(new_frame(Some(2), None), &EngineOptions::default()).unwrap();
        let frame_id = plan.frame.id;
        let snapshot = RearingSnapshot::new(vec![plan.frame]);

        let queen = plan_add_queen(&snapshot, frame_id, new_queen()).unwrap();
        assert!(queen.is_rearing());

        let mut bad = new_queen();
        bad.sweetness = 11;
        assert!(plan_add_queen(&snapshot, frame_id, bad).is_err());

        let mut bad = new_queen();
        bad.birth_year = 1800;
        assert!(plan_add_queen(&snapshot, frame_id, bad).is_err());

        let err = plan_add_queen(&snapshot, Uuid::new_v4(), new_queen()).unwrap_err();
        assert!(matches!(err, RearingError::NotFound { kind: EntityKind::Frame, .. }));
    }
}
