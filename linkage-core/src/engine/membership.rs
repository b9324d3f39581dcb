//! Cluster membership as singly linked chains over item indices.
//!
//! Each item owns exactly one `next` link; a cluster is described by the head
//! and tail of its chain so two clusters can be joined in constant time.

use std::iter::FusedIterator;

use crate::error::{LinkageError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Chain {
    first: usize,
    last: usize,
    count: usize,
}

/// Membership chains indexed by active slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Memberships {
    next: Vec<Option<usize>>,
    chains: Vec<Chain>,
}

impl Memberships {
    /// One singleton chain per item, slot `i` holding item `i`.
    pub(crate) fn singletons(items: usize) -> Result<Self> {
        let mut next = Vec::new();
        next.try_reserve_exact(items)
            .map_err(|_| exhausted::<Option<usize>>(items))?;
        next.resize(items, None);

        let mut chains = Vec::new();
        chains
            .try_reserve_exact(items)
            .map_err(|_| exhausted::<Chain>(items))?;
        chains.extend((0..items).map(|item| Chain {
            first: item,
            last: item,
            count: 1,
        }));
        Ok(Self { next, chains })
    }

    /// Appends the chain at `from` to the chain at `into`.
    ///
    /// The chain at `from` is left describing the same items until
    /// [`Memberships::release`] drops it.
    pub(crate) fn splice(&mut self, into: usize, from: usize) {
        debug_assert_ne!(into, from, "a chain cannot absorb itself");
        let donor = self.chains[from];
        let target = &mut self.chains[into];
        self.next[target.last] = Some(donor.first);
        target.last = donor.last;
        target.count += donor.count;
    }

    /// Drops the chain at `slot`, moving the final chain into its place.
    pub(crate) fn release(&mut self, slot: usize) {
        self.chains.swap_remove(slot);
    }

    /// Number of members in the cluster at `slot`.
    pub(crate) fn count(&self, slot: usize) -> usize {
        self.chains[slot].count
    }

    /// Walks the members of the cluster at `slot` in chain order.
    pub(crate) fn iter(&self, slot: usize) -> Members<'_> {
        let chain = self.chains[slot];
        Members {
            next: &self.next,
            cursor: Some(chain.first),
            remaining: chain.count,
        }
    }
}

fn exhausted<T>(items: usize) -> LinkageError {
    LinkageError::ResourceExhausted {
        structure: "membership chains",
        bytes: (items as u64).saturating_mul(std::mem::size_of::<T>() as u64),
    }
}

/// Iterator over the item indices belonging to one cluster.
///
/// Yields items in merge order: the survivor's members first, followed by
/// each absorbed cluster's members in the order they were joined.
#[derive(Clone, Debug)]
pub struct Members<'a> {
    next: &'a [Option<usize>],
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for Members<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.cursor?;
        self.remaining -= 1;
        self.cursor = self.next[item];
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Members<'_> {}

impl FusedIterator for Members<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(memberships: &Memberships, slot: usize) -> Vec<usize> {
        memberships.iter(slot).collect()
    }

    #[test]
    fn singletons_hold_their_own_index() {
        let memberships = Memberships::singletons(3).expect("allocates");
        assert_eq!(members(&memberships, 0), [0]);
        assert_eq!(members(&memberships, 2), [2]);
        assert_eq!(memberships.count(1), 1);
    }

    #[test]
    fn splice_appends_donor_after_target() {
        let mut memberships = Memberships::singletons(4).expect("allocates");
        memberships.splice(1, 3);
        memberships.splice(0, 2);
        memberships.splice(0, 1);

        assert_eq!(members(&memberships, 0), [0, 2, 1, 3]);
        assert_eq!(memberships.count(0), 4);
        assert_eq!(memberships.iter(0).len(), 4);
    }

    #[test]
    fn release_moves_the_final_chain_into_the_gap() {
        let mut memberships = Memberships::singletons(4).expect("allocates");
        memberships.splice(0, 1);
        memberships.release(1);

        assert_eq!(members(&memberships, 0), [0, 1]);
        assert_eq!(members(&memberships, 1), [3]);
        assert_eq!(members(&memberships, 2), [2]);
    }

    #[test]
    fn iteration_stops_at_the_chain_tail() {
        let mut memberships = Memberships::singletons(3).expect("allocates");
        memberships.splice(0, 1);
        let mut iter = memberships.iter(0);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
