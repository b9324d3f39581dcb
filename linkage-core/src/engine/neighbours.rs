//! Per-slot nearest-neighbour cache.
//!
//! Slot `i` caches its closest slot `j > i`, ties resolved towards the lowest
//! `j`. The global closest pair is then the best cached entry, ties resolved
//! towards the lowest `i`.

use super::cluster_distances::ClusterDistances;

/// Closest higher slot and its distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Nearest {
    pub(crate) slot: usize,
    pub(crate) distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NeighbourCache {
    entries: Vec<Option<Nearest>>,
    rescans: u64,
}

impl NeighbourCache {
    /// Scans every row of `table` over `active` slots.
    pub(crate) fn initialize(table: &ClusterDistances, active: usize) -> Self {
        let entries = (0..active).map(|slot| scan(table, slot, active)).collect();
        Self {
            entries,
            rescans: 0,
        }
    }

    #[rustfmt::skip]
    pub(crate) fn active(&self) -> usize { self.entries.len() }

    /// Number of row rescans performed since initialisation.
    #[rustfmt::skip]
    pub(crate) fn rescans(&self) -> u64 { self.rescans }

    pub(crate) fn entry(&self, slot: usize) -> Option<Nearest> {
        self.entries.get(slot).copied().flatten()
    }

    /// Best cached pair `(i, nearest)`, or `None` with fewer than two
    /// active slots.
    pub(crate) fn global_min(&self) -> Option<(usize, Nearest)> {
        let mut best: Option<(usize, Nearest)> = None;
        for (slot, entry) in self.entries.iter().enumerate() {
            let Some(candidate) = *entry else { continue };
            if best.is_none_or(|(_, current)| candidate.distance < current.distance) {
                best = Some((slot, candidate));
            }
        }
        best
    }

    /// Recomputes the entry for `slot` from its row.
    pub(crate) fn refresh(&mut self, slot: usize, table: &ClusterDistances) {
        self.entries[slot] = scan(table, slot, self.entries.len());
        self.rescans += 1;
        super::record_rescan();
    }

    /// Folds a changed distance `D(slot, candidate)` into the entry for
    /// `slot`, rescanning only when the cached neighbour moved away.
    pub(crate) fn offer(
        &mut self,
        slot: usize,
        candidate: usize,
        distance: f32,
        table: &ClusterDistances,
    ) {
        debug_assert!(slot < candidate, "entries only track higher slots");
        let proposed = Nearest {
            slot: candidate,
            distance,
        };
        match self.entries[slot] {
            Some(current) if current.slot == candidate => {
                if distance <= current.distance {
                    self.entries[slot] = Some(proposed);
                } else {
                    self.refresh(slot, table);
                }
            }
            Some(current)
                if distance < current.distance
                    || (distance == current.distance && candidate < current.slot) =>
            {
                self.entries[slot] = Some(proposed);
            }
            Some(_) => {}
            None => self.entries[slot] = Some(proposed),
        }
    }

    /// Drops the entry of the final slot after the active count shrinks to
    /// `active`.
    pub(crate) fn truncate(&mut self, active: usize) {
        self.entries.truncate(active);
    }

    /// Repairs entries after the retired slot was the final one: any entry
    /// pointing at it must be rescanned.
    pub(crate) fn forget(&mut self, retired: usize, table: &ClusterDistances) {
        for slot in 0..self.entries.len() {
            if self.entries[slot].is_some_and(|nearest| nearest.slot == retired) {
                self.refresh(slot, table);
            }
        }
    }

    /// Repairs entries after the final slot `last` was compacted into
    /// `removed`. `table` must already reflect the compaction.
    pub(crate) fn relocate(&mut self, removed: usize, last: usize, table: &ClusterDistances) {
        for slot in 0..self.entries.len() {
            if slot == removed {
                continue;
            }
            let Some(current) = self.entries[slot] else { continue };
            if current.slot == last {
                if slot < removed {
                    // Same cluster and distance under its new slot.
                    self.entries[slot] = Some(Nearest {
                        slot: removed,
                        distance: current.distance,
                    });
                } else {
                    self.refresh(slot, table);
                }
            } else if current.slot == removed {
                self.refresh(slot, table);
            } else if slot < removed {
                self.offer(slot, removed, table.get(slot, removed), table);
            }
        }
        self.refresh(removed, table);
    }
}

fn scan(table: &ClusterDistances, slot: usize, active: usize) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for (offset, &distance) in table.row(slot, active).iter().enumerate() {
        if best.is_none_or(|current| distance < current.distance) {
            best = Some(Nearest {
                slot: slot + 1 + offset,
                distance,
            });
        }
    }
    best
}
