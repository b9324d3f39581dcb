//! Shared fixtures for the CLI unit tests.

use std::fs;
use std::path::PathBuf;

use rstest::fixture;
use tempfile::TempDir;

use super::commands::run_command;
use super::{CliError, RunCommand};

pub(super) const FIVE_POINTS: &str = "5\n\
    p0| 0 0 0\n\
    p1| 0 1 0\n\
    p2| 5 5 0\n\
    p3| 5 6 0\n\
    p4| 10 10 0\n";

#[fixture]
pub(super) fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

pub(super) fn write_points(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write point file");
    path
}

pub(super) fn command(path: PathBuf, clusters: usize) -> RunCommand {
    RunCommand {
        path,
        clusters,
        normalize: false,
        name: None,
        max_bytes: None,
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(summary) => panic!("{panic_msg}: {summary:?}"),
        Err(err) => err,
    }
}
