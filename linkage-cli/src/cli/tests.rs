//! Unit tests for the `run` command, its argument parsing and rendering.

use super::commands::{ByteSizeError, derive_data_source_name, parse_byte_size, run_command};
use super::test_helpers::{
    FIVE_POINTS, command, run_command_expecting_error, temp_dir, write_points,
};
use super::{Cli, CliError, ClusterSummary, Command, ExecutionSummary, render_summary, run_cli};

use std::path::Path;

use clap::Parser;
use linkage_core::LinkageError;
use linkage_providers_points::PointsProviderError;
use linkage_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

const GIB: u64 = 1024 * 1024 * 1024;

#[rstest]
#[case::override_name("/tmp/source.txt", Some("override"), "override")]
#[case::stem_with_extension("/tmp/source.txt", None, "source")]
#[case::stem_without_extension("/tmp/source", None, "source")]
#[case::missing_stem("", None, "points")]
fn derive_data_source_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    assert_eq!(
        derive_data_source_name(Path::new(raw_path), override_name),
        expected
    );
}

#[rstest]
fn run_reports_clusters_centroids_and_error(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let cli = Cli {
        command: Command::Run(command(path, 2)),
    };

    let summary = run_cli(cli).expect("run succeeds");

    assert_eq!(summary.data_source, "five");
    assert_eq!(summary.item_count, 5);
    assert_eq!(summary.merges, 3);
    let labels: Vec<&[String]> = summary.clusters.iter().map(|c| c.labels.as_slice()).collect();
    assert_eq!(labels, [&["p0", "p1", "p2", "p3"][..], &["p4"][..]]);
    assert_eq!(summary.clusters[0].centroid, [2.5, 3.0, 0.0]);
    assert_eq!(summary.clusters[1].centroid, [10.0, 10.0, 0.0]);
    let expected = 2.0 * 15.25_f64.sqrt() + 2.0 * 10.25_f64.sqrt();
    assert!((summary.quantization_error - expected).abs() < 1e-4);
}

#[rstest]
fn one_cluster_per_item_has_no_error(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);

    let summary = run_command(command(path, 5)).expect("run succeeds");

    assert_eq!(summary.merges, 0);
    assert_eq!(summary.clusters.len(), 5);
    assert!(summary.clusters.iter().all(|c| c.labels.len() == 1));
    assert_eq!(summary.quantization_error, 0.0);
}

#[rstest]
fn normalised_points_are_centred(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "skewed.txt", "3\na| 1 100\nb| 2 300\nc| 6 200\n");
    let mut cmd = command(path, 1);
    cmd.normalize = true;

    let summary = run_command(cmd).expect("run succeeds");

    let centroid = &summary.clusters[0].centroid;
    assert!(centroid.iter().all(|value| value.abs() < 1e-5), "{centroid:?}");
}

#[rstest]
fn name_override_is_reported(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let mut cmd = command(path, 2);
    cmd.name = Some("custom".into());

    let summary = run_command(cmd).expect("run succeeds");
    assert_eq!(summary.data_source, "custom");
}

#[rstest]
fn zero_clusters_are_rejected(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let err = run_command_expecting_error(command(path, 0), "zero clusters must fail");
    assert!(matches!(
        err,
        CliError::Core(LinkageError::InvalidClusterCount { got: 0 })
    ));
}

#[rstest]
fn more_clusters_than_items_are_rejected(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let err = run_command_expecting_error(command(path, 6), "six clusters must fail");
    assert!(matches!(
        err,
        CliError::Core(LinkageError::TooManyClusters {
            items: 5,
            requested: 6,
            ..
        })
    ));
}

#[rstest]
fn missing_files_surface_provider_errors(temp_dir: TempDir) {
    let path = temp_dir.path().join("absent.txt");
    let err = run_command_expecting_error(command(path, 1), "missing file must fail");
    assert!(matches!(err, CliError::Provider(PointsProviderError::Io(_))));
}

#[rstest]
fn malformed_files_surface_provider_errors(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "short.txt", "3\na| 1\nb| 2\n");
    let err = run_command_expecting_error(command(path, 1), "short file must fail");
    assert!(matches!(
        err,
        CliError::Provider(PointsProviderError::CountMismatch {
            declared: 3,
            found: 2,
        })
    ));
}

#[rstest]
#[case::one_byte(1)]
#[case::zero(0)]
fn small_memory_limits_reject_the_run(temp_dir: TempDir, #[case] limit: u64) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let mut cmd = command(path, 2);
    cmd.max_bytes = Some(limit);

    let err = run_command_expecting_error(cmd, "tiny limit must be exceeded");
    assert!(
        matches!(
            err,
            CliError::Core(LinkageError::MemoryLimitExceeded { limit: l, .. }) if l == limit
        ),
        "expected MemoryLimitExceeded, got {err:?}"
    );
}

#[rstest]
fn generous_memory_limits_allow_the_run(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "five.txt", FIVE_POINTS);
    let mut cmd = command(path, 2);
    cmd.max_bytes = Some(GIB);

    let summary = run_command(cmd).expect("one GiB is plenty");
    assert_eq!(summary.clusters.len(), 2);
}

#[rstest]
#[case::plain_bytes("1024", 1024)]
#[case::zero("0", 0)]
#[case::explicit_bytes("12B", 12)]
#[case::suffix_k_lower("100k", 100 * 1024)]
#[case::suffix_k_upper("100K", 100 * 1024)]
#[case::suffix_kb("100KB", 100 * 1024)]
#[case::suffix_kib("100KiB", 100 * 1024)]
#[case::suffix_m_lower("512m", 512 * 1024 * 1024)]
#[case::suffix_m_upper("512M", 512 * 1024 * 1024)]
#[case::suffix_mb("512MB", 512 * 1024 * 1024)]
#[case::suffix_mib("512MiB", 512 * 1024 * 1024)]
#[case::suffix_g("2g", 2 * GIB)]
#[case::suffix_gb("2GB", 2 * GIB)]
#[case::suffix_gib("2GiB", 2 * GIB)]
#[case::suffix_t("1T", 1024 * GIB)]
#[case::suffix_tib("1TiB", 1024 * GIB)]
#[case::spaced(" 3 MiB ", 3 * 1024 * 1024)]
fn parse_byte_size_accepts_valid_input(#[case] input: &str, #[case] expected: u64) {
    assert_eq!(parse_byte_size(input), Ok(expected));
}

#[rstest]
#[case::empty("")]
#[case::only_suffix("M")]
#[case::negative("-100")]
fn parse_byte_size_requires_a_number(#[case] input: &str) {
    assert!(matches!(
        parse_byte_size(input),
        Err(ByteSizeError::MissingNumber(_))
    ));
}

#[rstest]
#[case::unknown_suffix("100X")]
#[case::decimal("1.5G")]
#[case::petabytes("1P")]
fn parse_byte_size_rejects_unknown_units(#[case] input: &str) {
    assert!(matches!(
        parse_byte_size(input),
        Err(ByteSizeError::UnknownUnit(_))
    ));
}

#[rstest]
#[case::scaled("18446744073709551615T")]
#[case::too_many_digits("99999999999999999999")]
fn parse_byte_size_rejects_overflow(#[case] input: &str) {
    assert!(matches!(
        parse_byte_size(input),
        Err(ByteSizeError::Overflow(_))
    ));
}

#[rstest]
fn clap_parses_every_run_flag() {
    let args = [
        "linkage",
        "run",
        "data.txt",
        "-k",
        "4",
        "--normalize",
        "--name",
        "demo",
        "--max-bytes",
        "2G",
    ];
    let Command::Run(cmd) = Cli::try_parse_from(args).expect("valid args").command;

    assert_eq!(cmd.path, Path::new("data.txt"));
    assert_eq!(cmd.clusters, 4);
    assert!(cmd.normalize);
    assert_eq!(cmd.name.as_deref(), Some("demo"));
    assert_eq!(cmd.max_bytes, Some(2 * GIB));
}

#[rstest]
fn clap_applies_defaults() {
    let Command::Run(cmd) = Cli::try_parse_from(["linkage", "run", "data.txt"])
        .expect("valid args")
        .command;

    assert_eq!(cmd.clusters, linkage_core::DEFAULT_CLUSTER_COUNT);
    assert!(!cmd.normalize);
    assert_eq!(cmd.name, None);
    assert_eq!(cmd.max_bytes, None);
}

#[rstest]
#[case::fractional_size(&["linkage", "run", "data.txt", "--max-bytes", "1.5G"])]
#[case::negative_clusters(&["linkage", "run", "data.txt", "--clusters", "-1"])]
#[case::missing_path(&["linkage", "run"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn render_summary_lists_clusters_and_error() {
    let summary = ExecutionSummary {
        data_source: "demo".into(),
        item_count: 3,
        merges: 1,
        clusters: vec![
            ClusterSummary {
                labels: vec!["a".into(), "b".into()],
                centroid: vec![0.5, 0.0],
            },
            ClusterSummary {
                labels: vec!["c".into()],
                centroid: vec![4.0, 4.0],
            },
        ],
        quantization_error: 1.0,
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer).expect("writing to a vector succeeds");

    let text = String::from_utf8(buffer).expect("summary is UTF-8");
    assert_eq!(
        text,
        "data source: demo\n\
         items: 3\n\
         clusters: 2\n\
         merges: 1\n\
         cluster 0 [2]: a b\n  centroid: 0.5 0\n\
         cluster 1 [1]: c\n  centroid: 4 4\n\
         quantization error: 1.000000\n"
    );
}

#[rstest]
fn run_emits_tracing_fields(temp_dir: TempDir) {
    let path = write_points(&temp_dir, "points.txt", FIVE_POINTS);
    let mut cmd = command(path, 2);
    cmd.max_bytes = Some(1 << 20);
    let cli = Cli {
        command: Command::Run(cmd),
    };
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let summary =
        tracing::subscriber::with_default(subscriber, || run_cli(cli)).expect("run succeeds");
    assert_eq!(summary.data_source, "points");

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.field("command"), Some("run"));

    let execute = layer.span("cli.execute").expect("cli.execute span must exist");
    assert_eq!(execute.field("clusters"), Some("2"));
    assert_eq!(execute.field("normalize"), Some("false"));
    assert_eq!(execute.field("max_bytes"), Some("1048576"));

    let load = layer
        .span("cli.load_points")
        .expect("cli.load_points span must exist");
    assert!(load.field("path").is_some_and(|path| path.ends_with("points.txt")));
    assert!(layer.span("core.run").is_some());

    assert!(layer.events().iter().any(|event| {
        event.level == Level::INFO
            && event.message() == Some("command completed")
            && event.field("data_source") == Some("points")
            && event.field("merges") == Some("3")
    }));
}

#[rstest]
fn load_failures_are_recorded_on_the_load_span(temp_dir: TempDir) {
    let path = temp_dir.path().join("missing.txt");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let err = tracing::subscriber::with_default(subscriber, || run_command(command(path, 1)))
        .expect_err("missing file must fail");
    assert!(matches!(err, CliError::Provider(_)));

    let load = layer
        .span("cli.load_points")
        .expect("cli.load_points span must exist");
    assert!(load.field("path").is_some_and(|path| path.ends_with("missing.txt")));
    assert!(layer.span("core.run").is_none());
}
