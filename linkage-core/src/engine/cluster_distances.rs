//! Mutable cluster-to-cluster distance table addressed by active slot.

use super::{membership::Memberships, pairwise::PairwiseDistances, triangle::PackedTriangle};
use crate::error::Result;

/// Single-linkage distance between every pair of active clusters.
///
/// The table keeps its initial capacity for the whole run; only the prefix
/// `0..active` is meaningful.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClusterDistances {
    table: PackedTriangle,
}

impl ClusterDistances {
    /// Seeds the table from item distances, every item being its own
    /// cluster.
    pub(crate) fn seeded(pairwise: &PairwiseDistances) -> Result<Self> {
        let table = PackedTriangle::try_clone_from(pairwise.triangle(), "cluster distance table")?;
        Ok(Self { table })
    }

    pub(crate) fn get(&self, p: usize, q: usize) -> f32 {
        debug_assert_ne!(p, q, "clusters have no distance to themselves");
        self.table.get(p, q)
    }

    pub(crate) fn set(&mut self, p: usize, q: usize, distance: f32) {
        debug_assert_ne!(p, q, "clusters have no distance to themselves");
        self.table.set(p, q, distance);
    }

    /// Cells `(slot, slot + 1..active)`.
    pub(crate) fn row(&self, slot: usize, active: usize) -> &[f32] {
        self.table.row(slot, active)
    }

    /// Recomputes and stores the single-linkage distance between the
    /// clusters at `p` and `q`: the smallest item distance across the two
    /// member chains.
    pub(crate) fn recompute_single_linkage(
        &mut self,
        p: usize,
        q: usize,
        members: &Memberships,
        pairwise: &PairwiseDistances,
    ) -> f32 {
        let mut best = f32::INFINITY;
        for left in members.iter(p) {
            for right in members.iter(q) {
                best = best.min(pairwise.distance(left, right));
            }
        }
        self.set(p, q, best);
        best
    }

    /// Moves the final slot `last` into the vacated slot `removed` so the
    /// active prefix `0..last` stays dense.
    pub(crate) fn compact(&mut self, removed: usize, last: usize) {
        debug_assert!(removed < last);
        for slot in (0..last).filter(|&slot| slot != removed) {
            let moved = self.table.get(slot, last);
            self.table.set(slot, removed, moved);
        }
    }
}
