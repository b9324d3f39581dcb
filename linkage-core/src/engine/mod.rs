//! Single-linkage merge engine.
//!
//! The engine owns every working structure of one clustering run:
//!
//! - an immutable [`pairwise`] table of item distances,
//! - a [`cluster_distances`] table addressed by active slot,
//! - [`membership`] chains listing each cluster's items,
//! - a [`neighbours`] cache of each slot's closest higher slot,
//! - a [`slots`] table mapping stable [`ClusterHandle`]s to slots.
//!
//! Each [`MergeEngine::step`] joins the globally closest pair of clusters,
//! compacts the vacated slot away and repairs only the rows the merge
//! invalidated.

mod cluster_distances;
mod membership;
mod neighbours;
mod pairwise;
mod slots;
mod triangle;


use std::{num::NonZeroUsize, sync::Arc};

use tracing::{debug, instrument, trace};

use self::{
    cluster_distances::ClusterDistances,
    membership::Memberships,
    neighbours::NeighbourCache,
    pairwise::PairwiseDistances,
    slots::SlotTable,
};
pub use self::{membership::Members, slots::ClusterHandle};
use crate::{
    datasource::DataSource,
    error::{LinkageError, Result},
    result::{Cluster, Partition},
};

/// Lifecycle of a [`MergeEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// More clusters are active than the target.
    Running,
    /// The active count has reached the target; no further merges happen.
    Done,
}

/// One merge performed by [`MergeEngine::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeStep {
    /// Handle of the cluster that absorbed the other and stays active.
    pub survivor: ClusterHandle,
    /// Handle of the cluster that was absorbed and retired.
    pub absorbed: ClusterHandle,
    /// Slots `(a, b)` of the two clusters before the merge, `a < b`.
    pub slots: (usize, usize),
    /// Squared single-linkage distance between the merged clusters.
    pub distance: f32,
    /// Active clusters remaining after the merge.
    pub active_after: usize,
}

/// Agglomerative single-linkage engine stepping towards a target cluster
/// count.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use linkage_core::{EngineState, MergeEngine, PointSet};
///
/// let source = PointSet::from_rows("line", vec![vec![0.0], vec![1.0], vec![5.0]])?;
/// let mut engine = MergeEngine::new(&source, NonZeroUsize::new(2).unwrap())?;
///
/// let step = engine.step().expect("one merge is pending");
/// assert_eq!(step.slots, (0, 1));
/// assert_eq!(step.distance, 1.0);
/// assert_eq!(engine.state(), EngineState::Done);
/// assert!(engine.step().is_none());
///
/// let partition = engine.into_partition();
/// assert_eq!(partition.clusters()[0].members(), [0, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct MergeEngine {
    data_source: Arc<str>,
    target: NonZeroUsize,
    pairwise: PairwiseDistances,
    distances: ClusterDistances,
    members: Memberships,
    neighbours: NeighbourCache,
    slots: SlotTable,
    merges: usize,
}

impl MergeEngine {
    /// Builds every working structure for `source` with all items as
    /// singleton clusters.
    ///
    /// A `target` at or above the item count leaves the engine
    /// [`EngineState::Done`] with zero merges to perform.
    ///
    /// # Errors
    /// Returns [`LinkageError::EmptySource`] when `source` has no items,
    /// [`LinkageError::DataSource`] when a distance cannot be computed and
    /// [`LinkageError::ResourceExhausted`] when a structure cannot be
    /// allocated.
    #[instrument(
        name = "core.engine.build",
        err,
        skip(source),
        fields(data_source = %source.name(), items = source.len(), target = target.get()),
    )]
    pub fn new<D: DataSource + ?Sized>(source: &D, target: NonZeroUsize) -> Result<Self> {
        let data_source: Arc<str> = Arc::from(source.name());
        if source.is_empty() {
            return Err(LinkageError::EmptySource { data_source });
        }
        let items = source.len();
        let pairwise = PairwiseDistances::build(source)?;
        let distances = ClusterDistances::seeded(&pairwise)?;
        let members = Memberships::singletons(items)?;
        let slots = SlotTable::identity(items)?;
        let neighbours = NeighbourCache::initialize(&distances, items);
        debug!(items, "engine structures built");
        Ok(Self {
            data_source,
            target,
            pairwise,
            distances,
            members,
            neighbours,
            slots,
            merges: 0,
        })
    }

    /// Name of the data source the engine was built from.
    #[must_use]
    #[rustfmt::skip]
    pub fn data_source(&self) -> &str { &self.data_source }

    /// Target cluster count.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> NonZeroUsize { self.target }

    /// Number of items being clustered.
    #[must_use]
    #[rustfmt::skip]
    pub fn item_count(&self) -> usize { self.pairwise.item_count() }

    /// Number of currently active clusters.
    #[must_use]
    #[rustfmt::skip]
    pub fn active_count(&self) -> usize { self.slots.active() }

    /// Number of merges performed so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn merge_count(&self) -> usize { self.merges }

    /// Number of nearest-neighbour row rescans performed after
    /// initialisation.
    #[must_use]
    #[rustfmt::skip]
    pub fn neighbour_rescans(&self) -> u64 { self.neighbours.rescans() }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.active_count() > self.target.get() {
            EngineState::Running
        } else {
            EngineState::Done
        }
    }

    /// Slot currently holding the cluster named by `handle`, or `None` once
    /// it has been absorbed.
    #[must_use]
    pub fn slot_of(&self, handle: ClusterHandle) -> Option<usize> {
        self.slots.slot(handle)
    }

    /// Handle of the cluster at `slot`, or `None` past the active range.
    #[must_use]
    pub fn handle_at(&self, slot: usize) -> Option<ClusterHandle> {
        self.slots.get_handle(slot)
    }

    /// Members of the active cluster named by `handle`.
    #[must_use]
    pub fn members(&self, handle: ClusterHandle) -> Option<Members<'_>> {
        self.slot_of(handle).map(|slot| self.members.iter(slot))
    }

    /// Stored single-linkage distance between two distinct active clusters.
    #[must_use]
    pub fn cluster_distance(&self, a: ClusterHandle, b: ClusterHandle) -> Option<f32> {
        let (p, q) = (self.slot_of(a)?, self.slot_of(b)?);
        (p != q).then(|| self.distances.get(p, q))
    }

    /// Cached closest higher-slot neighbour of the cluster named by
    /// `handle`, with its distance.
    #[must_use]
    pub fn nearest_neighbour(&self, handle: ClusterHandle) -> Option<(ClusterHandle, f32)> {
        let nearest = self.neighbours.entry(self.slot_of(handle)?)?;
        Some((self.slots.handle(nearest.slot), nearest.distance))
    }

    /// Performs the next merge, or returns `None` once
    /// [`EngineState::Done`].
    pub fn step(&mut self) -> Option<MergeStep> {
        if self.state() == EngineState::Done {
            return None;
        }
        let (a, nearest) = self.neighbours.global_min()?;
        let b = nearest.slot;
        debug_assert!(a < b && b < self.active_count());

        let survivor = self.slots.handle(a);
        self.members.splice(a, b);
        let absorbed = self.slots.retire(b);
        self.members.release(b);
        let last = self.slots.active();
        self.neighbours.truncate(last);

        if b == last {
            self.neighbours.forget(last, &self.distances);
        } else {
            self.distances.compact(b, last);
            self.neighbours.relocate(b, last, &self.distances);
        }
        self.relink(a);

        self.merges += 1;
        record_merge();
        trace!(
            %survivor,
            %absorbed,
            slot_a = a,
            slot_b = b,
            distance = nearest.distance,
            active = last,
            "merged clusters"
        );
        Some(MergeStep {
            survivor,
            absorbed,
            slots: (a, b),
            distance: nearest.distance,
            active_after: last,
        })
    }

    /// Merges until [`EngineState::Done`] and returns the number of merges
    /// performed by this call.
    pub fn run(&mut self) -> usize {
        let mut performed = 0;
        while self.step().is_some() {
            performed += 1;
        }
        debug!(
            merges = self.merges,
            active = self.active_count(),
            rescans = self.neighbours.rescans(),
            "engine reached target"
        );
        performed
    }

    /// Snapshot of the active clusters in slot order.
    #[must_use]
    pub fn partition(&self) -> Partition {
        let clusters = (0..self.active_count())
            .map(|slot| Cluster::new(self.slots.handle(slot), self.members.iter(slot).collect()))
            .collect();
        Partition::new(clusters, self.item_count(), self.merges)
    }

    /// Consumes the engine, returning its current partition.
    #[must_use]
    pub fn into_partition(self) -> Partition {
        self.partition()
    }

    /// Recomputes the survivor's row and folds the new values into the
    /// neighbour cache.
    fn relink(&mut self, a: usize) {
        for other in 0..self.active_count() {
            if other == a {
                continue;
            }
            let distance =
                self.distances
                    .recompute_single_linkage(a, other, &self.members, &self.pairwise);
            if other < a {
                self.neighbours.offer(other, a, distance, &self.distances);
            }
        }
        self.neighbours.refresh(a, &self.distances);
    }
}

#[cfg(feature = "metrics")]
fn record_merge() {
    metrics::counter!("linkage_merges_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_merge() {}

#[cfg(feature = "metrics")]
fn record_rescan() {
    metrics::counter!("linkage_neighbour_rescans_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_rescan() {}
