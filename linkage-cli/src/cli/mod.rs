//! Command-line interface for single-linkage clustering of point files.
//!
//! The `run` command loads a point file, optionally normalises it, merges
//! clusters down to the requested count and reports the partition together
//! with its centroids and quantisation error.

mod commands;

pub use commands::{
    ByteSizeError, Cli, CliError, ClusterSummary, Command, ExecutionSummary, RunCommand,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
