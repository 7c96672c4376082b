// src/types.rs

//! Closed enumerations shared by the catalog, the gate and the store.
//!
//! Every enum serializes to the identifier used by the remote backend
//! (`"Greffage"`, `"AFaire"`, ...), so snapshots and store payloads stay
//! compatible with existing data. `FromStr` accepts either that identifier or
//! the snake_case Rust name, case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::RearingError;

pub type FrameId = Uuid;
pub type QueenId = Uuid;
pub type CycleId = Uuid;
pub type TaskId = Uuid;

/// One of the seven fixed steps of a rearing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepKind {
    #[serde(rename = "Greffage")]
    Grafting,
    #[serde(rename = "Operculation")]
    Capping,
    #[serde(rename = "NaissanceReine")]
    QueenEmergence,
    #[serde(rename = "ControleVolFecondation")]
    MatingFlightCheck,
    #[serde(rename = "ValidationPonte")]
    LayingValidation,
    #[serde(rename = "MarquageReine")]
    QueenMarking,
    #[serde(rename = "MiseEnVente")]
    ReadyForSale,
}

impl StepKind {
    pub const ALL: [StepKind; 7] = [
        StepKind::Grafting,
        StepKind::Capping,
        StepKind::QueenEmergence,
        StepKind::MatingFlightCheck,
        StepKind::LayingValidation,
        StepKind::QueenMarking,
        StepKind::ReadyForSale,
    ];

    /// Identifier used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Grafting => "Greffage",
            StepKind::Capping => "Operculation",
            StepKind::QueenEmergence => "NaissanceReine",
            StepKind::MatingFlightCheck => "ControleVolFecondation",
            StepKind::LayingValidation => "ValidationPonte",
            StepKind::QueenMarking => "MarquageReine",
            StepKind::ReadyForSale => "MiseEnVente",
        }
    }

    fn rust_name(self) -> &'static str {
        match self {
            StepKind::Grafting => "grafting",
            StepKind::Capping => "capping",
            StepKind::QueenEmergence => "queen_emergence",
            StepKind::MatingFlightCheck => "mating_flight_check",
            StepKind::LayingValidation => "laying_validation",
            StepKind::QueenMarking => "queen_marking",
            StepKind::ReadyForSale => "ready_for_sale",
        }
    }

    /// Position in the catalog (0-based). Used as the tie-breaker when two
    /// tasks of a cycle share a day offset.
    pub fn catalog_index(self) -> usize {
        StepKind::ALL
            .iter()
            .position(|k| *k == self)
            .unwrap_or(StepKind::ALL.len())
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = RearingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        StepKind::ALL
            .into_iter()
            .find(|k| {
                k.as_str().eq_ignore_ascii_case(needle) || k.rust_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| RearingError::Validation(format!("unknown step kind: {needle}")))
    }
}

/// Status of a single cycle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "AFaire")]
    Pending,
    #[serde(rename = "Faite")]
    Done,
    /// Set by the external overdue detector, never by this crate.
    #[serde(rename = "EnRetard")]
    Overdue,
    #[serde(rename = "Annulee")]
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Done,
        TaskStatus::Overdue,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "AFaire",
            TaskStatus::Done => "Faite",
            TaskStatus::Overdue => "EnRetard",
            TaskStatus::Cancelled => "Annulee",
        }
    }

    /// Done and Cancelled never change again and never block later steps.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = RearingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "afaire" | "pending" => Ok(TaskStatus::Pending),
            "faite" | "done" => Ok(TaskStatus::Done),
            "enretard" | "overdue" => Ok(TaskStatus::Overdue),
            "annulee" | "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(RearingError::Validation(format!(
                "unknown task status: {other}"
            ))),
        }
    }
}

/// Status of a breeding cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CycleStatus {
    #[default]
    #[serde(rename = "EnCours")]
    InProgress,
    #[serde(rename = "Termine")]
    Completed,
    #[serde(rename = "Annule")]
    Cancelled,
}

impl CycleStatus {
    pub const ALL: [CycleStatus; 3] = [
        CycleStatus::InProgress,
        CycleStatus::Completed,
        CycleStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CycleStatus::InProgress => "EnCours",
            CycleStatus::Completed => "Termine",
            CycleStatus::Cancelled => "Annule",
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CycleStatus {
    type Err = RearingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "encours" | "in_progress" => Ok(CycleStatus::InProgress),
            "termine" | "completed" => Ok(CycleStatus::Completed),
            "annule" | "cancelled" => Ok(CycleStatus::Cancelled),
            other => Err(RearingError::Validation(format!(
                "unknown cycle status: {other}"
            ))),
        }
    }
}

/// Queen status. The rearing workflow only ever writes `Fecondee` and
/// `DisponibleVente`; the other values come from direct edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QueenStatus {
    #[default]
    NonFecondee,
    Fecondee,
    DisponibleVente,
    Vendu,
    Perdue,
    Eliminee,
}

impl QueenStatus {
    pub const ALL: [QueenStatus; 6] = [
        QueenStatus::NonFecondee,
        QueenStatus::Fecondee,
        QueenStatus::DisponibleVente,
        QueenStatus::Vendu,
        QueenStatus::Perdue,
        QueenStatus::Eliminee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueenStatus::NonFecondee => "NonFecondee",
            QueenStatus::Fecondee => "Fecondee",
            QueenStatus::DisponibleVente => "DisponibleVente",
            QueenStatus::Vendu => "Vendu",
            QueenStatus::Perdue => "Perdue",
            QueenStatus::Eliminee => "Eliminee",
        }
    }
}

impl fmt::Display for QueenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueenStatus {
    type Err = RearingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        QueenStatus::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| RearingError::Validation(format!("unknown queen status: {needle}")))
    }
}
