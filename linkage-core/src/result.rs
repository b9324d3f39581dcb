//! Result types for clustering operations.
//!
//! A [`Partition`] lists the final clusters in slot order together with a
//! per-item [`ClusterId`] lookup.

use crate::engine::ClusterHandle;

/// One final cluster: its stable handle and member item indices.
///
/// Members appear in merge order, starting with the item whose handle the
/// cluster carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    handle: ClusterHandle,
    members: Vec<usize>,
}

impl Cluster {
    pub(crate) fn new(handle: ClusterHandle, members: Vec<usize>) -> Self {
        debug_assert!(!members.is_empty(), "clusters always hold at least one item");
        Self { handle, members }
    }

    /// Returns the stable handle naming this cluster.
    #[rustfmt::skip]
    #[must_use]
    pub fn handle(&self) -> ClusterHandle { self.handle }

    /// Returns the member item indices in merge order.
    #[rustfmt::skip]
    #[must_use]
    pub fn members(&self) -> &[usize] { &self.members }

    /// Returns the number of members.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.members.len() }

    /// Always `false`: a cluster holds at least one item.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }
}

/// Represents the output of an [`crate::Agglomerative::run`] invocation.
///
/// # Examples
/// ```
/// use linkage_core::{AgglomerativeBuilder, ClusterId, PointSet};
///
/// let source = PointSet::from_rows("pairs", vec![
///     vec![0.0], vec![0.5], vec![9.0], vec![9.5],
/// ])?;
/// let partition = AgglomerativeBuilder::new()
///     .with_cluster_count(2)
///     .build()?
///     .run(&source)?;
///
/// assert_eq!(partition.cluster_count(), 2);
/// assert_eq!(partition.merge_count(), 2);
/// assert_eq!(partition.assignment(1), Some(ClusterId::new(0)));
/// assert_eq!(partition.assignment(3), Some(ClusterId::new(1)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    clusters: Vec<Cluster>,
    assignments: Vec<ClusterId>,
    merges: usize,
}

impl Partition {
    pub(crate) fn new(clusters: Vec<Cluster>, item_count: usize, merges: usize) -> Self {
        let mut assignments = vec![ClusterId::new(0); item_count];
        for (position, cluster) in clusters.iter().enumerate() {
            for &item in cluster.members() {
                assignments[item] = ClusterId::new(position as u64);
            }
        }
        Self {
            clusters,
            assignments,
            merges,
        }
    }

    /// Returns the clusters in final slot order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns each item's cluster, indexed by item.
    ///
    /// The identifier is the cluster's position in [`Partition::clusters`].
    #[must_use]
    pub fn assignments(&self) -> &[ClusterId] {
        &self.assignments
    }

    /// Returns the cluster holding `item`.
    #[must_use]
    pub fn assignment(&self, item: usize) -> Option<ClusterId> {
        self.assignments.get(item).copied()
    }

    /// Returns the cluster identified by `id`.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.clusters.get(index))
    }

    /// Number of clusters in the partition.
    #[rustfmt::skip]
    #[must_use]
    pub fn cluster_count(&self) -> usize { self.clusters.len() }

    /// Number of items covered by the partition.
    #[rustfmt::skip]
    #[must_use]
    pub fn item_count(&self) -> usize { self.assignments.len() }

    /// Number of merges performed to reach the partition.
    #[rustfmt::skip]
    #[must_use]
    pub fn merge_count(&self) -> usize { self.merges }
}

/// Identifier assigned to a cluster within a [`Partition`].
///
/// # Examples
/// ```
/// use linkage_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u64 { self.0 }
}
