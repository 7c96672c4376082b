// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gating;
pub mod logging;
pub mod model;
pub mod store;
pub mod types;
pub mod view;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::catalog::step_kinds;
use crate::cli::{CliArgs, Command, NewFrameArgs};
use crate::config::load_or_default;
use crate::engine::{AutoQueens, NewFrame, RearingEngine};
use crate::store::MemoryStore;
use crate::store::snapshot::{load_snapshot, save_snapshot};

/// Entry point used by `main.rs`.
///
/// Loads the config and the snapshot, runs one command through the engine
/// and writes the snapshot back when the command can have changed it.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_or_default(&args.config)?;
    if let Some(path) = args.snapshot.clone() {
        cfg = cfg.with_snapshot_path(path);
    }
    debug!(
        config = %args.config.display(),
        snapshot = %cfg.snapshot_path().display(),
        "configuration loaded"
    );

    let store = load_snapshot(cfg.snapshot_path())?;
    let engine = RearingEngine::new(store.clone(), cfg.to_engine_options());

    let outcome = execute(&engine, &args.command).await;

    if args.command.is_mutating() {
        save_snapshot(&store, cfg.snapshot_path())?;
    }

    outcome.map_err(|err| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })
}

async fn execute(engine: &RearingEngine<MemoryStore>, command: &Command) -> errors::Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::Catalog => print_catalog(),
        Command::Status => {
            print!("{}", engine.dashboard().await?);
        }
        Command::Complete { task_id, on } => {
            let report = engine.complete_task_on(*task_id, on.unwrap_or(today)).await?;
            println!(
                "{} done on {}",
                report.kind.label(),
                report.task.completed_on.unwrap_or(today)
            );
            if !report.cascade.queens_updated.is_empty() {
                println!("{} queen(s) updated", report.cascade.queens_updated.len());
            }
            if report.closed_cycle() {
                println!("cycle completed");
            }
        }
        Command::Start { frame_id, on } => {
            let cycle = engine.start_cycle(*frame_id, on.unwrap_or(today)).await?;
            println!("cycle {} started on {}", cycle.id, cycle.start_date);
            print_schedule(cycle.start_date, &cycle.tasks);
        }
        Command::Cancel { cycle_id } => {
            let cycle = engine.cancel_cycle(*cycle_id, today).await?;
            println!("cycle {} cancelled", cycle.id);
        }
        Command::NewFrame(new) => {
            let frame = engine.create_frame(new_frame(new, today)).await?;
            println!(
                "frame {} ({}) created with {} cell(s), {} queen(s)",
                frame.reference,
                frame.id,
                frame.cell_count,
                frame.queens.len()
            );
        }
        Command::DeleteFrame { frame_id } => {
            let deletion = engine.delete_frame(*frame_id).await?;
            println!(
                "frame deleted: {} cycle(s), {} task(s) removed, {} queen(s) detached",
                deletion.cycles_removed, deletion.tasks_removed, deletion.queens_detached
            );
        }
    }

    info!("command finished");
    Ok(())
}

fn new_frame(args: &NewFrameArgs, today: NaiveDate) -> NewFrame {
    NewFrame {
        reference: args.reference.clone(),
        created_on: today,
        cell_count: args.cells,
        note: args.note.clone(),
        auto_queens: match (&args.lineage, args.auto_queens) {
            (Some(lineage), true) => Some(AutoQueens {
                lineage: lineage.clone(),
                color: args.color.clone(),
            }),
            _ => None,
        },
    }
}

fn print_catalog() {
    for step in step_kinds() {
        println!("J{:<3} {:<24} {}", step.day_offset, step.kind.as_str(), step.label);
    }
}

fn print_schedule(start: NaiveDate, tasks: &[model::CycleTask]) {
    for task in tasks {
        println!("  {}  {}  {}", task.expected_date(start), task.kind.label(), task.id);
    }
}
