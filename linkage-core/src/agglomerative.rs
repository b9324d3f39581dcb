//! Clustering entry point for the linkage library.
//!
//! Provides the [`Agglomerative`] runtime, which validates a run against the
//! data source before handing it to the [`MergeEngine`].

use std::{num::NonZeroUsize, sync::Arc};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    Result,
    datasource::DataSource,
    engine::MergeEngine,
    error::LinkageError,
    memory::{estimate_peak_bytes, format_bytes},
    result::Partition,
};

/// Entry point for running single-linkage clustering.
///
/// # Examples
/// ```
/// use linkage_core::{AgglomerativeBuilder, PointSet};
///
/// let source = PointSet::from_rows("demo", vec![
///     vec![0.0, 0.0],
///     vec![0.0, 1.0],
///     vec![5.0, 5.0],
///     vec![5.0, 6.0],
///     vec![10.0, 10.0],
/// ])?;
/// let clustering = AgglomerativeBuilder::new()
///     .with_cluster_count(2)
///     .build()?;
/// let partition = clustering.run(&source)?;
///
/// let members: Vec<&[usize]> = partition.clusters().iter().map(|c| c.members()).collect();
/// assert_eq!(members, [&[0, 1, 2, 3][..], &[4][..]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Agglomerative {
    cluster_count: NonZeroUsize,
    memory_limit: Option<u64>,
}

impl Agglomerative {
    pub(crate) fn new(cluster_count: NonZeroUsize, memory_limit: Option<u64>) -> Self {
        Self {
            cluster_count,
            memory_limit,
        }
    }

    /// Returns the number of clusters a run stops at.
    #[must_use]
    pub fn cluster_count(&self) -> NonZeroUsize {
        self.cluster_count
    }

    /// Returns the configured memory limit in bytes.
    #[must_use]
    pub fn memory_limit(&self) -> Option<u64> {
        self.memory_limit
    }

    /// Clusters `source` down to the configured cluster count.
    ///
    /// # Errors
    /// Returns [`LinkageError::EmptySource`] when the source is empty,
    /// [`LinkageError::TooManyClusters`] when it has fewer items than the
    /// cluster count, [`LinkageError::MemoryLimitExceeded`] when the peak
    /// estimate exceeds the configured limit, and any error raised while
    /// building the [`MergeEngine`].
    pub fn run<D: DataSource + ?Sized>(&self, source: &D) -> Result<Partition> {
        self.run_target(source, self.cluster_count)
    }

    /// Runs one independent clustering per entry of `targets`, returning
    /// partitions in the same order.
    ///
    /// Runs execute in parallel when the `parallel` feature is enabled. Each
    /// run builds its own engine; nothing is shared between them.
    ///
    /// # Errors
    /// Returns the first error produced by any run, with the same contract
    /// as [`Agglomerative::run`].
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    /// use linkage_core::{AgglomerativeBuilder, PointSet};
    ///
    /// let source = PointSet::from_rows("line", vec![vec![0.0], vec![1.0], vec![9.0]])?;
    /// let targets = [NonZeroUsize::MIN, NonZeroUsize::new(3).expect("non-zero")];
    /// let partitions = AgglomerativeBuilder::new().build()?.run_many(&source, &targets)?;
    ///
    /// assert_eq!(partitions[0].cluster_count(), 1);
    /// assert_eq!(partitions[1].merge_count(), 0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn run_many<D: DataSource + Sync + ?Sized>(
        &self,
        source: &D,
        targets: &[NonZeroUsize],
    ) -> Result<Vec<Partition>> {
        #[cfg(feature = "parallel")]
        {
            targets
                .par_iter()
                .map(|&target| self.run_target(source, target))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            targets
                .iter()
                .map(|&target| self.run_target(source, target))
                .collect()
        }
    }

    #[instrument(
        name = "core.run",
        err,
        skip(self, source),
        fields(
            data_source = %source.name(),
            items = source.len(),
            clusters = target.get(),
        ),
    )]
    fn run_target<D: DataSource + ?Sized>(&self, source: &D, target: NonZeroUsize) -> Result<Partition> {
        let items = source.len();
        if items == 0 {
            warn!(
                data_source = source.name(),
                "data source is empty, returning error"
            );
            return Err(LinkageError::EmptySource {
                data_source: Arc::from(source.name()),
            });
        }
        if target.get() > items {
            warn!(items, requested = target.get(), "more clusters requested than items");
            return Err(LinkageError::TooManyClusters {
                data_source: Arc::from(source.name()),
                items,
                requested: target.get(),
            });
        }
        if let Some(limit) = self.memory_limit {
            let estimated = estimate_peak_bytes(items);
            if estimated > limit {
                warn!(
                    estimated = %format_bytes(estimated),
                    limit = %format_bytes(limit),
                    "estimated peak memory exceeds the configured limit"
                );
                return Err(LinkageError::MemoryLimitExceeded { estimated, limit });
            }
        }

        let mut engine = MergeEngine::new(source, target)?;
        let merges = engine.run();
        let partition = engine.into_partition();
        info!(
            clusters = partition.cluster_count(),
            merges, "clustering completed"
        );
        Ok(partition)
    }
}
