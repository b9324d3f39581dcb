//! Labelled points and the in-memory [`PointSet`] data source.

use crate::{datasource::DataSource, error::DataSourceError};

/// A labelled coordinate vector.
///
/// # Examples
/// ```
/// use linkage_core::Point;
///
/// let point = Point::new("a", vec![1.0, 2.0]);
/// assert_eq!(point.label(), "a");
/// assert_eq!(point.coordinates(), [1.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    label: String,
    coordinates: Vec<f32>,
}

impl Point {
    /// Creates a point from a label and its coordinates.
    #[must_use]
    pub fn new(label: impl Into<String>, coordinates: Vec<f32>) -> Self {
        Self {
            label: label.into(),
            coordinates,
        }
    }

    /// Returns the point's label.
    #[must_use]
    #[rustfmt::skip]
    pub fn label(&self) -> &str { &self.label }

    /// Returns the point's coordinates.
    #[must_use]
    #[rustfmt::skip]
    pub fn coordinates(&self) -> &[f32] { &self.coordinates }

    /// Returns mutable access to the coordinates for preprocessing passes
    /// such as normalisation.
    #[must_use]
    pub fn coordinates_mut(&mut self) -> &mut [f32] {
        &mut self.coordinates
    }
}

/// Dense, validated point collection backed by a row-major buffer.
///
/// Construction guarantees a non-empty set, a positive uniform dimension and
/// finite coordinates, so distance lookups only fail on bad indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    name: String,
    dimension: usize,
    labels: Vec<String>,
    values: Vec<f32>,
}

impl PointSet {
    /// Validates `points` and packs them into a contiguous buffer.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] for an empty input,
    /// [`DataSourceError::ZeroDimension`] when points have no coordinates,
    /// [`DataSourceError::DimensionMismatch`] when rows differ in length and
    /// [`DataSourceError::NonFinite`] when any coordinate is NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// use linkage_core::{DataSource, DataSourceError, Point, PointSet};
    ///
    /// let set = PointSet::try_new("demo", vec![
    ///     Point::new("a", vec![0.0, 0.0]),
    ///     Point::new("b", vec![3.0, 4.0]),
    /// ])?;
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.label(1), Some("b"));
    /// assert_eq!(set.squared_distance(0, 1)?, 25.0);
    ///
    /// let ragged = PointSet::try_new("bad", vec![
    ///     Point::new("a", vec![0.0]),
    ///     Point::new("b", vec![0.0, 1.0]),
    /// ]);
    /// assert!(matches!(ragged, Err(DataSourceError::DimensionMismatch { .. })));
    /// # Ok::<(), DataSourceError>(())
    /// ```
    pub fn try_new(name: impl Into<String>, points: Vec<Point>) -> Result<Self, DataSourceError> {
        let Some(first) = points.first() else {
            return Err(DataSourceError::EmptyData);
        };
        let dimension = first.coordinates.len();
        if dimension == 0 {
            return Err(DataSourceError::ZeroDimension);
        }

        let mut labels = Vec::with_capacity(points.len());
        let mut values = Vec::with_capacity(points.len().saturating_mul(dimension));
        for (index, point) in points.into_iter().enumerate() {
            if point.coordinates.len() != dimension {
                return Err(DataSourceError::DimensionMismatch {
                    left: dimension,
                    right: point.coordinates.len(),
                });
            }
            if let Some((offset, &value)) = point
                .coordinates
                .iter()
                .enumerate()
                .find(|(_, value)| !value.is_finite())
            {
                return Err(DataSourceError::NonFinite {
                    index,
                    dimension: offset,
                    value,
                });
            }
            values.extend_from_slice(&point.coordinates);
            labels.push(point.label);
        }

        Ok(Self {
            name: name.into(),
            dimension,
            labels,
            values,
        })
    }

    /// Builds an unlabelled set from raw rows, labelling each point by its
    /// index.
    ///
    /// # Errors
    /// Same as [`PointSet::try_new`].
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<f32>>) -> Result<Self, DataSourceError> {
        let points = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| Point::new(index.to_string(), row))
            .collect();
        Self::try_new(name, points)
    }

    /// Returns the row-major coordinate buffer.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns every label in item order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl DataSource for PointSet {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn point(&self, index: usize) -> Result<&[f32], DataSourceError> {
        if index >= self.labels.len() {
            return Err(DataSourceError::OutOfBounds { index });
        }
        let start = index * self.dimension;
        Ok(&self.values[start..start + self.dimension])
    }

    fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}
