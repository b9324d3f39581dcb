//! Immutable table of squared item-to-item distances.

use super::triangle::PackedTriangle;
use crate::{
    datasource::DataSource,
    error::{LinkageError, Result},
};

/// Squared Euclidean distance for every unordered pair of items, computed
/// once before the first merge.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PairwiseDistances {
    table: PackedTriangle,
}

impl PairwiseDistances {
    /// Computes the table row by row through
    /// [`DataSource::squared_distances_from`].
    pub(crate) fn build<D: DataSource + ?Sized>(source: &D) -> Result<Self> {
        let items = source.len();
        let mut table = PackedTriangle::try_zeroed(items, "pairwise distance table")?;
        let indices: Vec<usize> = (0..items).collect();
        for row in 0..items.saturating_sub(1) {
            let distances = source
                .squared_distances_from(row, &indices[row + 1..])
                .map_err(|error| LinkageError::data_source(source.name(), error))?;
            table.row_mut(row).copy_from_slice(&distances);
        }
        Ok(Self { table })
    }

    /// Number of items covered by the table.
    #[rustfmt::skip]
    pub(crate) fn item_count(&self) -> usize { self.table.order() }

    /// Distance between items `a` and `b`; zero when they coincide.
    pub(crate) fn distance(&self, a: usize, b: usize) -> f32 {
        if a == b { 0.0 } else { self.table.get(a, b) }
    }

    pub(super) fn triangle(&self) -> &PackedTriangle {
        &self.table
    }
}
