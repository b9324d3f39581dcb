//! Packed strict-upper-triangle storage shared by the distance tables.
//!
//! Row `i` holds columns `i + 1..order` contiguously, so an order-`n`
//! triangle needs `n (n - 1) / 2` cells and a row's tail can be scanned as a
//! slice.

use crate::error::LinkageError;

const CELL_BYTES: u64 = 4;

#[derive(Clone, Debug, PartialEq)]
pub(super) struct PackedTriangle {
    order: usize,
    values: Vec<f32>,
}

impl PackedTriangle {
    /// Number of cells needed for an order-`order` triangle, or `None` on
    /// overflow.
    pub(super) fn cell_count(order: usize) -> Option<usize> {
        order
            .checked_mul(order.saturating_sub(1))
            .map(|product| product / 2)
    }

    /// Allocates a zeroed triangle, surfacing allocation failure instead of
    /// aborting.
    pub(super) fn try_zeroed(order: usize, structure: &'static str) -> Result<Self, LinkageError> {
        let values = try_allocate(order, structure)?;
        Ok(Self { order, values })
    }

    /// Allocates a copy of `other` under the same failure contract as
    /// [`Self::try_zeroed`].
    pub(super) fn try_clone_from(other: &Self, structure: &'static str) -> Result<Self, LinkageError> {
        let mut values = try_allocate(other.order, structure)?;
        values.copy_from_slice(&other.values);
        Ok(Self {
            order: other.order,
            values,
        })
    }

    #[rustfmt::skip]
    pub(super) fn order(&self) -> usize { self.order }

    fn offset(&self, row: usize, column: usize) -> usize {
        debug_assert!(
            row < column && column < self.order,
            "triangle cell ({row}, {column}) outside order {}",
            self.order
        );
        // row * (2n - row - 1) is always even.
        row * (2 * self.order - row - 1) / 2 + (column - row - 1)
    }

    /// Reads the cell for the unordered pair `{a, b}`; `a != b`.
    pub(super) fn get(&self, a: usize, b: usize) -> f32 {
        let (row, column) = canonical(a, b);
        self.values[self.offset(row, column)]
    }

    /// Writes the cell for the unordered pair `{a, b}`; `a != b`.
    pub(super) fn set(&mut self, a: usize, b: usize, value: f32) {
        let (row, column) = canonical(a, b);
        let offset = self.offset(row, column);
        self.values[offset] = value;
    }

    /// Returns cells `(row, row + 1..end)`.
    pub(super) fn row(&self, row: usize, end: usize) -> &[f32] {
        debug_assert!(end <= self.order);
        if row + 1 >= end {
            return &[];
        }
        let start = self.offset(row, row + 1);
        &self.values[start..start + (end - row - 1)]
    }

    /// Returns the full mutable tail of `row`.
    pub(super) fn row_mut(&mut self, row: usize) -> &mut [f32] {
        if row + 1 >= self.order {
            return &mut [];
        }
        let start = self.offset(row, row + 1);
        let len = self.order - row - 1;
        &mut self.values[start..start + len]
    }
}

/// Orders a pair so the smaller index comes first.
pub(super) fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn try_allocate(order: usize, structure: &'static str) -> Result<Vec<f32>, LinkageError> {
    let Some(cells) = PackedTriangle::cell_count(order) else {
        return Err(LinkageError::ResourceExhausted {
            structure,
            bytes: u64::MAX,
        });
    };
    let mut values = Vec::new();
    values
        .try_reserve_exact(cells)
        .map_err(|_| LinkageError::ResourceExhausted {
            structure,
            bytes: (cells as u64).saturating_mul(CELL_BYTES),
        })?;
    values.resize(cells, 0.0);
    Ok(values)
}
