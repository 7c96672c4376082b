// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::EngineOptions;

/// Configuration as read from a TOML file.
///
/// ```toml
/// [store]
/// snapshot = "rearing-snapshot.toml"
/// timeout_ms = 5000
///
/// [cycle]
/// close_on_final_step = true
///
/// [frame]
/// default_cell_count = 20
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub cycle: CycleSection,

    #[serde(default)]
    pub frame: FrameSection,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// TOML file backing the in-memory store.
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,

    /// Upper bound for one store call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("rearing-snapshot.toml")
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// `[cycle]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleSection {
    /// Mark a cycle Completed when its last open task is done.
    #[serde(default = "default_close_on_final_step")]
    pub close_on_final_step: bool,
}

fn default_close_on_final_step() -> bool {
    true
}

impl Default for CycleSection {
    fn default() -> Self {
        Self {
            close_on_final_step: default_close_on_final_step(),
        }
    }
}

/// `[frame]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSection {
    #[serde(default = "default_cell_count")]
    pub default_cell_count: u32,
}

fn default_cell_count() -> u32 {
    20
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            default_cell_count: default_cell_count(),
        }
    }
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    store: StoreSection,
    cycle: CycleSection,
    frame: FrameSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(store: StoreSection, cycle: CycleSection, frame: FrameSection) -> Self {
        Self { store, cycle, frame }
    }

    pub fn store(&self) -> &StoreSection {
        &self.store
    }

    pub fn cycle(&self) -> &CycleSection {
        &self.cycle
    }

    pub fn frame(&self) -> &FrameSection {
        &self.frame
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.store.snapshot
    }

    /// Replace the snapshot path, e.g. from a `--snapshot` flag.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.snapshot = path.into();
        self
    }

    pub fn to_engine_options(&self) -> EngineOptions {
        EngineOptions {
            store_timeout: Duration::from_millis(self.store.timeout_ms),
            close_cycle_on_final_step: self.cycle.close_on_final_step,
            default_cell_count: self.frame.default_cell_count,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            StoreSection::default(),
            CycleSection::default(),
            FrameSection::default(),
        )
    }
}
