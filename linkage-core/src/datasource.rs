//! Data source abstractions for the linkage core runtime.

use crate::error::DataSourceError;

/// Abstraction over an ordered collection of fixed-dimension points.
///
/// The clustering engine only ever asks for squared Euclidean distances, so
/// implementations backed by something other than raw coordinates can
/// override [`DataSource::squared_distance`] directly.
///
/// # Examples
/// ```
/// use linkage_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<[f32; 1]>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn dimension(&self) -> usize { 1 }
///     fn point(&self, index: usize) -> Result<&[f32], DataSourceError> {
///         self.0
///             .get(index)
///             .map(|row| row.as_slice())
///             .ok_or(DataSourceError::OutOfBounds { index })
///     }
/// }
///
/// let src = Line(vec![[1.0], [2.0], [4.0]]);
/// assert_eq!(src.len(), 3);
/// assert_eq!(src.squared_distance(0, 2)?, 9.0);
/// assert_eq!(src.squared_distances_from(0, &[1, 2])?, [1.0, 9.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns number of items in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns the dimensionality shared by every point.
    fn dimension(&self) -> usize;

    /// Returns the coordinates of the point at `index`.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] when `index >= len()`.
    fn point(&self, index: usize) -> Result<&[f32], DataSourceError>;

    /// Returns the label attached to the point at `index`, if any.
    fn label(&self, _index: usize) -> Option<&str> {
        None
    }

    /// Computes the squared Euclidean distance between two points.
    ///
    /// The sum is accumulated in `f64` and narrowed once at the end.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] for invalid indices,
    /// [`DataSourceError::DimensionMismatch`] when the rows differ in length
    /// and [`DataSourceError::NonFinite`] when a coordinate is NaN or
    /// infinite.
    fn squared_distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        squared_euclidean((i, self.point(i)?), (j, self.point(j)?))
    }

    /// Computes the squared distances from `query` to every entry in
    /// `candidates`.
    ///
    /// The default implementation calls [`DataSource::squared_distance`]
    /// repeatedly. Implementations may override it with a faster kernel but
    /// must keep the same error contract.
    ///
    /// # Errors
    /// Returns the first [`DataSourceError`] surfaced for any candidate.
    fn squared_distances_from(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f32>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.squared_distance(query, candidate))
            .collect()
    }
}

/// Squared Euclidean distance between two indexed rows.
pub(crate) fn squared_euclidean(
    (i, left): (usize, &[f32]),
    (j, right): (usize, &[f32]),
) -> Result<f32, DataSourceError> {
    if left.len() != right.len() {
        return Err(DataSourceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    let mut sum = 0.0_f64;
    for (dimension, (&l, &r)) in left.iter().zip(right).enumerate() {
        ensure_finite(i, dimension, l)?;
        ensure_finite(j, dimension, r)?;
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    Ok(sum as f32)
}

fn ensure_finite(index: usize, dimension: usize, value: f32) -> Result<(), DataSourceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DataSourceError::NonFinite {
            index,
            dimension,
            value,
        })
    }
}
