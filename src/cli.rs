// src/cli.rs

//! Command-line interface of the `queen-rearing` driver.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;
use crate::types::{CycleId, FrameId, TaskId};

/// Drive the queen-rearing engine over a local snapshot file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "queen-rearing",
    version,
    about = "Track queen-rearing cycles: gated steps, queen status cascade, dashboard.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, global = true, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Snapshot file to use instead of `[store].snapshot`.
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Logging level. Falls back to `QUEEN_REARING_LOG`, then `info`.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the seven steps of a cycle with their day offsets.
    Catalog,

    /// Print the dashboard: counters, frames and tasks with their gate.
    Status,

    /// Mark a task as done. Only the next open step of its cycle is accepted.
    Complete {
        task_id: TaskId,
        /// Completion date (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        on: Option<NaiveDate>,
    },

    /// Start a new cycle on a frame.
    Start {
        frame_id: FrameId,
        /// Grafting date (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        on: Option<NaiveDate>,
    },

    /// Cancel an in-progress cycle.
    Cancel { cycle_id: CycleId },

    /// Create a frame.
    NewFrame(NewFrameArgs),

    /// Delete a frame with its cycles; its queens are detached.
    DeleteFrame { frame_id: FrameId },
}

#[derive(Debug, Clone, Args)]
pub struct NewFrameArgs {
    pub reference: String,

    /// Number of queen cells. Defaults to `[frame].default_cell_count`.
    #[arg(long, value_name = "N")]
    pub cells: Option<u32>,

    #[arg(long, default_value = "")]
    pub note: String,

    /// Create one queen per cell.
    #[arg(long, requires = "lineage")]
    pub auto_queens: bool,

    #[arg(long, value_name = "LINEAGE")]
    pub lineage: Option<String>,

    /// Marking colour. Defaults to the colour of the current year.
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Command {
    /// Whether the command writes to the store.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::Catalog | Command::Status)
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn config_defaults_to_the_loader_path() {
        let args = CliArgs::try_parse_from(["queen-rearing", "status"]).unwrap();
        assert_eq!(args.config, default_config_path());
    }

    #[test]
    fn complete_accepts_a_date() {
        let id = uuid::Uuid::new_v4();
        let args = CliArgs::try_parse_from([
            "queen-rearing",
            "complete",
            &id.to_string(),
            "--on",
            "2026-05-03",
        ])
        .unwrap();

        match args.command {
            Command::Complete { task_id, on } => {
                assert_eq!(task_id, id);
                assert_eq!(on, NaiveDate::from_ymd_opt(2026, 5, 3));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(args.command.is_mutating());
    }

    #[test]
    fn auto_queens_needs_a_lineage() {
        assert!(
            CliArgs::try_parse_from(["queen-rearing", "new-frame", "R-1", "--auto-queens"]).is_err()
        );
        let args = CliArgs::try_parse_from([
            "queen-rearing",
            "--snapshot",
            "snap.toml",
            "new-frame",
            "R-1",
            "--auto-queens",
            "--lineage",
            "Buckfast",
        ])
        .unwrap();
        assert_eq!(args.snapshot, Some(PathBuf::from("snap.toml")));
        assert!(matches!(args.command, Command::NewFrame(ref a) if a.auto_queens));
    }
}
