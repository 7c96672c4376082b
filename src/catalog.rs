// src/catalog.rs

//! Static template of a rearing cycle.
//!
//! A cycle always consists of the same seven steps, each scheduled a fixed
//! number of days after grafting. Nothing here is configurable at runtime.

use crate::types::{CycleStatus, QueenStatus, StepKind, TaskStatus};

/// One entry of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTemplate {
    pub kind: StepKind,
    pub day_offset: u32,
    pub label: &'static str,
}

const TEMPLATE: [StepTemplate; 7] = [
    StepTemplate {
        kind: StepKind::Grafting,
        day_offset: 0,
        label: "Greffage (J0)",
    },
    StepTemplate {
        kind: StepKind::Capping,
        day_offset: 6,
        label: "Operculation (J6)",
    },
    StepTemplate {
        kind: StepKind::QueenEmergence,
        day_offset: 12,
        label: "Naissance reine (J12)",
    },
    StepTemplate {
        kind: StepKind::MatingFlightCheck,
        day_offset: 16,
        label: "Contrôle vol fécondation (J16)",
    },
    StepTemplate {
        kind: StepKind::LayingValidation,
        day_offset: 21,
        label: "Validation ponte (J21)",
    },
    StepTemplate {
        kind: StepKind::QueenMarking,
        day_offset: 25,
        label: "Marquage reine (J25)",
    },
    StepTemplate {
        kind: StepKind::ReadyForSale,
        day_offset: 28,
        label: "Mise en vente (J28)",
    },
];

/// The ordered template, offsets strictly increasing.
pub fn step_kinds() -> &'static [StepTemplate; 7] {
    &TEMPLATE
}

impl StepKind {
    /// Theoretical day offset from cycle start.
    pub fn day_offset(self) -> u32 {
        TEMPLATE[self.catalog_index()].day_offset
    }

    pub fn label(self) -> &'static str {
        TEMPLATE[self.catalog_index()].label
    }
}

/// Display label for a raw step identifier; unknown values are returned as-is.
pub fn label_of(kind: &str) -> String {
    kind.parse::<StepKind>()
        .map(|k| k.label().to_string())
        .unwrap_or_else(|_| kind.to_string())
}

pub fn task_status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "A faire",
        TaskStatus::Done => "Faite",
        TaskStatus::Overdue => "En retard",
        TaskStatus::Cancelled => "Annulée",
    }
}

/// Label for a raw task status identifier; unknown values are returned as-is.
pub fn task_status_label_of(status: &str) -> String {
    status
        .parse::<TaskStatus>()
        .map(|s| task_status_label(s).to_string())
        .unwrap_or_else(|_| status.to_string())
}

pub fn cycle_status_label(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::InProgress => "En cours",
        CycleStatus::Completed => "Terminé",
        CycleStatus::Cancelled => "Annulé",
    }
}

/// Label for a raw cycle status identifier; unknown values are returned as-is.
pub fn cycle_status_label_of(status: &str) -> String {
    status
        .parse::<CycleStatus>()
        .map(|s| cycle_status_label(s).to_string())
        .unwrap_or_else(|_| status.to_string())
}

pub fn queen_status_label(status: QueenStatus) -> &'static str {
    match status {
        QueenStatus::NonFecondee => "Non fécondée",
        QueenStatus::Fecondee => "Fécondée",
        QueenStatus::DisponibleVente => "Disponible à la vente",
        QueenStatus::Vendu => "Vendue",
        QueenStatus::Perdue => "Perdue",
        QueenStatus::Eliminee => "Éliminée",
    }
}

/// International queen marking colour for a birth year (last digit).
pub fn marking_color_for_year(year: i32) -> &'static str {
    match year.rem_euclid(10) {
        1 | 6 => "Blanc",
        2 | 7 => "Jaune",
        3 | 8 => "Rouge",
        4 | 9 => "Vert",
        _ => "Bleu",
    }
}
