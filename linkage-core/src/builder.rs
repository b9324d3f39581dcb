//! Builder utilities for configuring agglomerative clustering runs.
//!
//! Validates parameters before constructing [`Agglomerative`] instances.

use std::num::NonZeroUsize;

use crate::{Result, agglomerative::Agglomerative, error::LinkageError};

/// Default number of clusters to stop at.
pub const DEFAULT_CLUSTER_COUNT: usize = 3;

/// Configures and constructs [`Agglomerative`] instances.
///
/// # Examples
/// ```
/// use linkage_core::AgglomerativeBuilder;
///
/// let clustering = AgglomerativeBuilder::new()
///     .with_cluster_count(4)
///     .with_memory_limit(Some(1 << 20))
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clustering.cluster_count().get(), 4);
/// assert_eq!(clustering.memory_limit(), Some(1 << 20));
/// ```
#[derive(Debug, Clone)]
pub struct AgglomerativeBuilder {
    cluster_count: usize,
    memory_limit: Option<u64>,
}

impl Default for AgglomerativeBuilder {
    fn default() -> Self {
        Self {
            cluster_count: DEFAULT_CLUSTER_COUNT,
            memory_limit: None,
        }
    }
}

impl AgglomerativeBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use linkage_core::AgglomerativeBuilder;
    ///
    /// let builder = AgglomerativeBuilder::new();
    /// assert_eq!(builder.cluster_count(), 3);
    /// assert_eq!(builder.memory_limit(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of clusters the run stops at.
    #[must_use]
    pub fn with_cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = count;
        self
    }

    /// Returns the configured cluster count.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Caps the estimated peak memory of a run; `None` disables the check.
    ///
    /// # Examples
    /// ```
    /// use linkage_core::AgglomerativeBuilder;
    ///
    /// let builder = AgglomerativeBuilder::new().with_memory_limit(Some(4096));
    /// assert_eq!(builder.memory_limit(), Some(4096));
    /// ```
    #[must_use]
    pub fn with_memory_limit(mut self, limit: Option<u64>) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Returns the configured memory limit in bytes.
    #[must_use]
    pub fn memory_limit(&self) -> Option<u64> {
        self.memory_limit
    }

    /// Validates the configuration and constructs an [`Agglomerative`]
    /// instance.
    ///
    /// # Errors
    /// Returns [`LinkageError::InvalidClusterCount`] when the cluster count is
    /// zero.
    ///
    /// # Examples
    /// ```
    /// use linkage_core::{AgglomerativeBuilder, LinkageError};
    ///
    /// let err = AgglomerativeBuilder::new()
    ///     .with_cluster_count(0)
    ///     .build()
    ///     .expect_err("zero clusters is rejected");
    /// assert!(matches!(err, LinkageError::InvalidClusterCount { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Agglomerative> {
        let cluster_count = NonZeroUsize::new(self.cluster_count).ok_or(
            LinkageError::InvalidClusterCount {
                got: self.cluster_count,
            },
        )?;

        Ok(Agglomerative::new(cluster_count, self.memory_limit))
    }
}
