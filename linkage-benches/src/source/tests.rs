//! Unit tests for the blob generator.

use super::{BlobConfig, SyntheticError, SyntheticSource};
use linkage_core::{AgglomerativeBuilder, DataSource, DataSourceError};
use rstest::{fixture, rstest};

fn base() -> BlobConfig {
    BlobConfig {
        point_count: 60,
        dimensions: 4,
        blob_count: 3,
        separation: 50.0,
        spread: 0.5,
        seed: 11,
    }
}

#[fixture]
fn blobs() -> BlobConfig {
    base()
}

#[rstest]
#[case::small(8, 2)]
#[case::wide(30, 16)]
fn generator_respects_shape(blobs: BlobConfig, #[case] point_count: usize, #[case] dimensions: usize) {
    let source = SyntheticSource::gaussian_blobs(&BlobConfig {
        point_count,
        dimensions,
        ..blobs
    })
    .expect("generation succeeds");

    assert_eq!(source.len(), point_count);
    assert_eq!(source.dimension(), dimensions);
    for index in 0..point_count {
        assert_eq!(source.point(index).expect("in range").len(), dimensions);
    }
    assert!(matches!(
        source.point(point_count),
        Err(DataSourceError::OutOfBounds { .. })
    ));
}

#[rstest]
fn points_are_assigned_round_robin(blobs: BlobConfig) {
    let source = SyntheticSource::gaussian_blobs(&blobs).expect("generation succeeds");
    assert_eq!(&source.blobs()[..6], [0, 1, 2, 0, 1, 2]);
}

#[rstest]
fn identical_seeds_generate_identical_points(blobs: BlobConfig) {
    let first = SyntheticSource::gaussian_blobs(&blobs).expect("generation succeeds");
    let second = SyntheticSource::gaussian_blobs(&blobs).expect("generation succeeds");
    let other = SyntheticSource::gaussian_blobs(&BlobConfig { seed: 12, ..blobs })
        .expect("generation succeeds");

    assert_eq!(first.point(7), second.point(7));
    assert_ne!(first.point(7), other.point(7));
}

#[rstest]
fn well_separated_blobs_are_recovered(blobs: BlobConfig) {
    let source = SyntheticSource::gaussian_blobs(&blobs).expect("generation succeeds");
    let partition = AgglomerativeBuilder::new()
        .with_cluster_count(blobs.blob_count)
        .build()
        .expect("cluster count is non-zero")
        .run(&source)
        .expect("run succeeds");

    for cluster in partition.clusters() {
        assert_eq!(cluster.len(), 20);
        let blob = source.blobs()[cluster.members()[0]];
        assert!(cluster.members().iter().all(|&item| source.blobs()[item] == blob));
    }
}

#[rstest]
#[case::zero_points(BlobConfig { point_count: 0, ..base() }, SyntheticError::ZeroPoints)]
#[case::zero_dimensions(BlobConfig { dimensions: 0, ..base() }, SyntheticError::ZeroDimensions)]
#[case::zero_blobs(BlobConfig { blob_count: 0, ..base() }, SyntheticError::ZeroBlobs)]
#[case::too_many_blobs(
    BlobConfig { point_count: 2, ..base() },
    SyntheticError::BlobCountExceedsPointCount { blob_count: 3, point_count: 2 },
)]
#[case::negative_spread(
    BlobConfig { spread: -1.0, ..base() },
    SyntheticError::InvalidFloatParameter { parameter: "spread", value: -1.0 },
)]
#[case::zero_separation(
    BlobConfig { separation: 0.0, ..base() },
    SyntheticError::InvalidFloatParameter { parameter: "separation", value: 0.0 },
)]
fn invalid_configurations_are_rejected(#[case] config: BlobConfig, #[case] expected: SyntheticError) {
    let err = SyntheticSource::gaussian_blobs(&config).expect_err("configuration must be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn zero_spread_places_points_on_centres(blobs: BlobConfig) {
    let source = SyntheticSource::gaussian_blobs(&BlobConfig { spread: 0.0, ..blobs })
        .expect("generation succeeds");
    assert_eq!(source.point(0), source.point(3));
}
