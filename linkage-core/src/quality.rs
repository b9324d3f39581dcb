//! Centroid and quantization-error reporting for a finished [`Partition`].

use thiserror::Error;

use crate::{datasource::DataSource, error::DataSourceError, result::Partition};

/// Centroids and quantization error computed for one partition.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityReport {
    /// Mean member coordinates, one entry per cluster in partition order.
    pub centroids: Vec<Vec<f32>>,
    /// Sum over all items of the Euclidean distance to their cluster's
    /// centroid.
    pub quantization_error: f64,
}

/// Errors raised while evaluating a partition.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QualityError {
    /// Reading a member's coordinates failed.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    /// The number of centroids differs from the number of clusters.
    #[error("expected {expected} centroids but got {actual}")]
    CentroidCountMismatch {
        /// Clusters in the partition.
        expected: usize,
        /// Centroids supplied by the caller.
        actual: usize,
    },
    /// The partition was computed over a different number of items.
    #[error("partition covers {partition_items} items but the data source has {source_items}")]
    PartitionMismatch {
        /// Items covered by the partition.
        partition_items: usize,
        /// Items in the data source.
        source_items: usize,
    },
}

fn ensure_matching<D: DataSource + ?Sized>(
    source: &D,
    partition: &Partition,
) -> Result<(), QualityError> {
    if partition.item_count() != source.len() {
        return Err(QualityError::PartitionMismatch {
            partition_items: partition.item_count(),
            source_items: source.len(),
        });
    }
    Ok(())
}

/// Computes each cluster's centroid as the mean of its members' coordinates.
///
/// # Errors
/// Returns [`QualityError::PartitionMismatch`] when the partition was built
/// over a different item count and [`QualityError::DataSource`] when a
/// member's coordinates cannot be read or disagree in dimension.
///
/// # Examples
/// ```
/// use linkage_core::{AgglomerativeBuilder, PointSet, quality};
///
/// let source = PointSet::from_rows("pairs", vec![
///     vec![0.0, 0.0], vec![2.0, 0.0], vec![10.0, 10.0],
/// ])?;
/// let partition = AgglomerativeBuilder::new().with_cluster_count(2).build()?.run(&source)?;
///
/// let centroids = quality::centroids(&source, &partition)?;
/// assert_eq!(centroids, [vec![1.0, 0.0], vec![10.0, 10.0]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn centroids<D: DataSource + ?Sized>(
    source: &D,
    partition: &Partition,
) -> Result<Vec<Vec<f32>>, QualityError> {
    ensure_matching(source, partition)?;
    let dimension = source.dimension();
    partition
        .clusters()
        .iter()
        .map(|cluster| {
            let mut sums = vec![0.0_f64; dimension];
            for &item in cluster.members() {
                let point = source.point(item)?;
                if point.len() != dimension {
                    return Err(DataSourceError::DimensionMismatch {
                        left: dimension,
                        right: point.len(),
                    }
                    .into());
                }
                for (sum, &value) in sums.iter_mut().zip(point) {
                    *sum += f64::from(value);
                }
            }
            let count = cluster.len() as f64;
            Ok(sums.into_iter().map(|sum| (sum / count) as f32).collect())
        })
        .collect()
}

/// Sums the Euclidean distance from every item to its cluster's centroid.
///
/// # Errors
/// Returns [`QualityError::CentroidCountMismatch`] when `centroids` does not
/// hold one entry per cluster, [`QualityError::PartitionMismatch`] when the
/// partition was built over a different item count and
/// [`QualityError::DataSource`] when coordinates cannot be read or disagree
/// in dimension with a centroid.
pub fn quantization_error<D: DataSource + ?Sized>(
    source: &D,
    partition: &Partition,
    centroids: &[Vec<f32>],
) -> Result<f64, QualityError> {
    ensure_matching(source, partition)?;
    if centroids.len() != partition.cluster_count() {
        return Err(QualityError::CentroidCountMismatch {
            expected: partition.cluster_count(),
            actual: centroids.len(),
        });
    }
    let mut total = 0.0_f64;
    for (cluster, centroid) in partition.clusters().iter().zip(centroids) {
        for &item in cluster.members() {
            let point = source.point(item)?;
            if point.len() != centroid.len() {
                return Err(DataSourceError::DimensionMismatch {
                    left: point.len(),
                    right: centroid.len(),
                }
                .into());
            }
            let squared: f64 = point
                .iter()
                .zip(centroid)
                .map(|(&value, &centre)| {
                    let diff = f64::from(value) - f64::from(centre);
                    diff * diff
                })
                .sum();
            total += squared.sqrt();
        }
    }
    Ok(total)
}

/// Computes centroids and the quantization error in one pass over the
/// partition.
///
/// # Errors
/// Same as [`centroids`] and [`quantization_error`].
pub fn evaluate<D: DataSource + ?Sized>(
    source: &D,
    partition: &Partition,
) -> Result<QualityReport, QualityError> {
    let centroids = centroids(source, partition)?;
    let quantization_error = quantization_error(source, partition, &centroids)?;
    Ok(QualityReport {
        centroids,
        quantization_error,
    })
}
