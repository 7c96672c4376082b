// tests/cli_driver.rs

use std::error::Error;
use std::fs;

use clap::Parser;
use queen_rearing::cli::CliArgs;
use queen_rearing::run;
use queen_rearing::store::snapshot::load_snapshot;
use queen_rearing::types::{CycleStatus, TaskStatus};
use queen_rearing_test_utils::init_tracing;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn args(config: &str, rest: &[&str]) -> CliArgs {
    let mut argv = vec!["queen-rearing", "--config", config];
    argv.extend_from_slice(rest);
    CliArgs::try_parse_from(argv).expect("valid arguments")
}

#[tokio::test]
async fn commands_persist_through_the_snapshot() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let snapshot = dir.path().join("data").join("snapshot.toml");
    let config = dir.path().join("Rearing.toml");
    fs::write(
        &config,
        format!(
            "[store]\nsnapshot = {:?}\n\n[frame]\ndefault_cell_count = 2\n",
            snapshot.display().to_string()
        ),
    )?;
    let config = config.display().to_string();

    run(args(&config, &["new-frame", "R-1", "--auto-queens", "--lineage", "Buckfast"])).await?;

    let data = load_snapshot(&snapshot)?.data()?;
    assert_eq!(data.frames.len(), 1);
    assert_eq!(data.queens.len(), 2);
    let frame_id = data.frames[0].id.to_string();

    run(args(&config, &["start", &frame_id, "--on", "2026-05-01"])).await?;
    let data = load_snapshot(&snapshot)?.data()?;
    assert_eq!(data.cycles.len(), 1);
    assert_eq!(data.tasks.len(), 7);

    let grafting = data
        .tasks
        .iter()
        .find(|t| t.day_offset == 0)
        .map(|t| t.id.to_string())
        .expect("grafting task");
    let capping = data
        .tasks
        .iter()
        .find(|t| t.day_offset == 6)
        .map(|t| t.id.to_string())
        .expect("capping task");

    // Capping is locked until grafting is done.
    assert!(run(args(&config, &["complete", &capping])).await.is_err());
    run(args(&config, &["complete", &grafting, "--on", "2026-05-01"])).await?;
    run(args(&config, &["status"])).await?;

    let data = load_snapshot(&snapshot)?.data()?;
    let done = data.tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    assert_eq!(done, 1);

    let cycle_id = data.cycles[0].id.to_string();
    run(args(&config, &["cancel", &cycle_id])).await?;
    let data = load_snapshot(&snapshot)?.data()?;
    assert_eq!(data.cycles[0].status, CycleStatus::Cancelled);

    run(args(&config, &["delete-frame", &frame_id])).await?;
    let data = load_snapshot(&snapshot)?.data()?;
    assert!(data.frames.is_empty());
    assert!(data.queens.iter().all(|q| q.frame_id.is_none()));
    Ok(())
}

#[tokio::test]
async fn snapshot_flag_overrides_config() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let snapshot = dir.path().join("override.toml");
    let missing_config = dir.path().join("absent.toml").display().to_string();
    let snapshot_arg = snapshot.display().to_string();

    run(args(
        &missing_config,
        &["--snapshot", &snapshot_arg, "new-frame", "R-9", "--cells", "3"],
    ))
    .await?;

    let data = load_snapshot(&snapshot)?.data()?;
    assert_eq!(data.frames[0].cell_count, 3);
    assert!(data.queens.is_empty());
    Ok(())
}
