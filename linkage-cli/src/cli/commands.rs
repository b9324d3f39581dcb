//! Argument parsing and execution of the `run` command.

use std::io::{self, Write};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use linkage_core::{
    AgglomerativeBuilder, DEFAULT_CLUSTER_COUNT, DataSource, LinkageError, Partition, PointSet,
    QualityError, quality,
};
use linkage_providers_points::{PointsProvider, PointsProviderError};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "linkage",
    about = "Single-linkage agglomerative clustering of labelled points."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a point file and report the resulting partition.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Point file: an item count followed by `label| c0 c1 ...` records.
    pub path: PathBuf,

    /// Number of clusters to stop at.
    #[arg(long, short = 'k', default_value_t = DEFAULT_CLUSTER_COUNT)]
    pub clusters: usize,

    /// Rescale every dimension to zero mean and unit variance first.
    #[arg(long)]
    pub normalize: bool,

    /// Override name for the data source (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,

    /// Refuse to run when the estimated peak memory exceeds this size
    /// (`1024`, `100k`, `512MiB`, `2G`, ...).
    #[arg(long = "max-bytes", value_parser = parse_byte_size)]
    pub max_bytes: Option<u64>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The point file could not be read or parsed.
    #[error(transparent)]
    Provider(#[from] PointsProviderError),
    /// Configuring or running the clustering failed.
    #[error(transparent)]
    Core(#[from] LinkageError),
    /// Evaluating the finished partition failed.
    #[error(transparent)]
    Quality(#[from] QualityError),
}

/// Reasons a `--max-bytes` value is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ByteSizeError {
    /// The value does not start with a decimal digit.
    #[error("expected a whole number of bytes with an optional unit, got `{0}`")]
    MissingNumber(String),
    /// The unit suffix is not one of `B`, `K`, `M`, `G` or `T` (with an
    /// optional `B` or `iB`).
    #[error("unknown size unit `{0}`")]
    UnknownUnit(String),
    /// The value does not fit in 64 bits.
    #[error("size `{0}` is too large")]
    Overflow(String),
}

/// Per-cluster section of an [`ExecutionSummary`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// Labels of the member items in membership order.
    pub labels: Vec<String>,
    /// Mean member coordinates.
    pub centroid: Vec<f32>,
}

/// Outcome of a `run` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Name of the data source.
    pub data_source: String,
    /// Number of items clustered.
    pub item_count: usize,
    /// Merges performed to reach the requested cluster count.
    pub merges: usize,
    /// Final clusters in partition order.
    pub clusters: Vec<ClusterSummary>,
    /// Sum of member-to-centroid Euclidean distances.
    pub quantization_error: f64,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, clustering or evaluation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use linkage_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "3\na| 0 0\nb| 0 1\nc| 9 9\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: file.path().to_path_buf(),
///         clusters: 2,
///         normalize: false,
///         name: None,
///         max_bytes: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.clusters[0].labels, ["a", "b"]);
/// assert_eq!(summary.clusters[1].labels, ["c"]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", "run");
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        clusters = command.clusters,
        normalize = command.normalize,
        max_bytes = field::Empty,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    if let Some(limit) = command.max_bytes {
        Span::current().record("max_bytes", limit);
    }
    let clustering = AgglomerativeBuilder::new()
        .with_cluster_count(command.clusters)
        .with_memory_limit(command.max_bytes)
        .build()?;

    let name = derive_data_source_name(&command.path, command.name.as_deref());
    let points = load_points(name, &command.path, command.normalize)?;
    let partition = clustering.run(&points)?;
    let summary = summarise(&points, &partition)?;

    info!(
        data_source = summary.data_source.as_str(),
        clusters = summary.clusters.len(),
        merges = summary.merges,
        quantization_error = summary.quantization_error,
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.load_points",
    err,
    skip(name),
    fields(path = %path.display()),
)]
pub(super) fn load_points(
    name: String,
    path: &Path,
    normalize: bool,
) -> Result<PointSet, CliError> {
    let mut provider = PointsProvider::try_from_path(name, path)?;
    if normalize {
        let stats = provider.normalize();
        debug!(
            dimensions = stats.means.len(),
            "normalised coordinates to zero mean and unit variance"
        );
    }
    Ok(provider.into_point_set()?)
}

fn summarise(points: &PointSet, partition: &Partition) -> Result<ExecutionSummary, CliError> {
    let report = quality::evaluate(points, partition)?;
    let clusters = partition
        .clusters()
        .iter()
        .zip(report.centroids)
        .map(|(cluster, centroid)| ClusterSummary {
            labels: cluster
                .members()
                .iter()
                .filter_map(|&item| points.label(item))
                .map(ToOwned::to_owned)
                .collect(),
            centroid,
        })
        .collect();
    Ok(ExecutionSummary {
        data_source: points.name().to_owned(),
        item_count: partition.item_count(),
        merges: partition.merge_count(),
        clusters,
        quantization_error: report.quantization_error,
    })
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "points".to_owned(), ToOwned::to_owned)
}

/// Parses a byte count with an optional binary unit.
///
/// Units are case-insensitive and may be written as `K`, `KB` or `KiB`
/// (likewise `M`, `G` and `T`); all of them are powers of 1024.
///
/// # Errors
/// Returns [`ByteSizeError`] for empty, signed, fractional, unknown-unit and
/// overflowing values.
pub(super) fn parse_byte_size(raw: &str) -> Result<u64, ByteSizeError> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(ByteSizeError::MissingNumber(raw.to_owned()));
    }

    let shift = match unit.trim_start().to_ascii_lowercase().as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        "t" | "tb" | "tib" => 40,
        _ => return Err(ByteSizeError::UnknownUnit(unit.to_owned())),
    };
    let overflow = |_: ParseIntError| ByteSizeError::Overflow(raw.to_owned());
    let value: u64 = digits.parse().map_err(overflow)?;
    value
        .checked_mul(1_u64 << shift)
        .ok_or_else(|| ByteSizeError::Overflow(raw.to_owned()))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use linkage_cli::cli::{ClusterSummary, ExecutionSummary, render_summary};
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     item_count: 1,
///     merges: 0,
///     clusters: vec![ClusterSummary {
///         labels: vec!["solo".into()],
///         centroid: vec![1.5, -2.0],
///     }],
///     quantization_error: 0.0,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("cluster 0 [1]: solo\n  centroid: 1.5 -2\n"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "items: {}", summary.item_count)?;
    writeln!(writer, "clusters: {}", summary.clusters.len())?;
    writeln!(writer, "merges: {}", summary.merges)?;
    for (index, cluster) in summary.clusters.iter().enumerate() {
        writeln!(
            writer,
            "cluster {index} [{}]: {}",
            cluster.labels.len(),
            cluster.labels.join(" ")
        )?;
        let centroid: Vec<String> = cluster.centroid.iter().map(f32::to_string).collect();
        writeln!(writer, "  centroid: {}", centroid.join(" "))?;
    }
    writeln!(
        writer,
        "quantization error: {:.6}",
        summary.quantization_error
    )?;
    Ok(())
}
