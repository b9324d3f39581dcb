//! Stable cluster handles layered over compacting slot indices.

use crate::error::{LinkageError, Result};

/// Stable identity of a cluster across merges.
///
/// Active clusters live in dense slots that are renumbered whenever a slot is
/// compacted away; a handle keeps naming the same cluster regardless. Each
/// cluster starts with the handle of its item index and a surviving cluster
/// keeps its handle when it absorbs another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterHandle(usize);

impl ClusterHandle {
    /// Creates a handle from its raw value.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(raw: usize) -> Self { Self(raw) }

    /// Returns the raw handle value.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> usize { self.0 }
}

impl std::fmt::Display for ClusterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two-way mapping between active slots and handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SlotTable {
    handles: Vec<ClusterHandle>,
    slots: Vec<Option<usize>>,
}

impl SlotTable {
    pub(crate) fn identity(items: usize) -> Result<Self> {
        let exhausted = || LinkageError::ResourceExhausted {
            structure: "slot table",
            bytes: footprint(items),
        };
        let mut handles = Vec::new();
        handles.try_reserve_exact(items).map_err(|_| exhausted())?;
        handles.extend((0..items).map(ClusterHandle));
        let mut slots = Vec::new();
        slots.try_reserve_exact(items).map_err(|_| exhausted())?;
        slots.extend((0..items).map(Some));
        Ok(Self { handles, slots })
    }

    #[rustfmt::skip]
    pub(crate) fn active(&self) -> usize { self.handles.len() }

    pub(crate) fn handle(&self, slot: usize) -> ClusterHandle {
        self.handles[slot]
    }

    pub(crate) fn get_handle(&self, slot: usize) -> Option<ClusterHandle> {
        self.handles.get(slot).copied()
    }

    pub(crate) fn slot(&self, handle: ClusterHandle) -> Option<usize> {
        self.slots.get(handle.0).copied().flatten()
    }

    /// Retires `slot`, moving the final slot's handle into it, and returns
    /// the retired handle.
    pub(crate) fn retire(&mut self, slot: usize) -> ClusterHandle {
        let retired = self.handles.swap_remove(slot);
        self.slots[retired.0] = None;
        if let Some(&moved) = self.handles.get(slot) {
            self.slots[moved.0] = Some(slot);
        }
        retired
    }
}

/// Bytes held by a slot table over `items` clusters.
fn footprint(items: usize) -> u64 {
    let per_item =
        std::mem::size_of::<ClusterHandle>() + std::mem::size_of::<Option<usize>>();
    (items as u64).saturating_mul(per_item as u64)
}
