// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs` maps the TOML file (`RawConfigFile`) and holds the validated
//!   form (`ConfigFile`).
//! - `loader.rs` reads a file from disk.
//! - `validate.rs` turns the raw form into the validated one.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, CycleSection, FrameSection, RawConfigFile, StoreSection};
