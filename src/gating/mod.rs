// src/gating/mod.rs

//! Sequential workflow gate.
//!
//! - [`gate`] holds the per-task classification types.
//! - [`sequence`] classifies the tasks of a single cycle.
//! - [`overview`] applies the same rule to a flat, cross-cycle task list.
//!
//! Nothing in here fails or mutates: the gate is recomputed from whatever
//! snapshot the caller fetched last.

pub mod gate;
pub mod overview;
pub mod sequence;

pub use gate::{Gate, TaskGate};
pub use overview::{GateMap, overview_gates};
pub use sequence::{actionability, gate_of, gating_order, next_actionable};
