//! Point-file reader.
//!
//! The format is line oriented: the first non-blank line holds the item
//! count, every following non-blank line one record of the form
//! `<label>| <c0> <c1> ...`. Blank lines are ignored.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use linkage_core::{Point, PointSet};
use tracing::{debug, instrument};

use crate::{
    errors::PointsProviderError,
    normalize::{ZScoreStats, z_score_normalize},
};

/// Parsed point file, ready to be normalised and turned into a
/// [`PointSet`].
///
/// # Examples
/// ```
/// use linkage_core::DataSource;
/// use linkage_providers_points::PointsProvider;
///
/// let input = "2\nalpha| 0 0\nbeta| 3 4\n";
/// let provider = PointsProvider::try_from_reader("demo", input.as_bytes())?;
/// assert_eq!(provider.dimension(), 2);
///
/// let points = provider.into_point_set()?;
/// assert_eq!(points.label(1), Some("beta"));
/// assert_eq!(points.squared_distance(0, 1)?, 25.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointsProvider {
    name: String,
    dimension: usize,
    points: Vec<Point>,
}

impl PointsProvider {
    /// Parses point records from `reader`.
    ///
    /// # Errors
    /// Returns a [`PointsProviderError`] describing the first malformed line,
    /// or [`PointsProviderError::CountMismatch`] when the record count
    /// differs from the header.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, PointsProviderError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|text| (index + 1, text)));

        let declared = loop {
            match lines.next().transpose()? {
                None => return Err(PointsProviderError::MissingHeader),
                Some((_, text)) if text.trim().is_empty() => continue,
                Some((line, text)) => break parse_count(line, text.trim())?,
            }
        };
        if declared == 0 {
            return Err(PointsProviderError::EmptyInput);
        }

        let mut points = Vec::with_capacity(declared.min(1 << 16));
        let mut dimension = None;
        for entry in lines {
            let (line, text) = entry?;
            if text.trim().is_empty() {
                continue;
            }
            let point = parse_record(line, &text)?;
            let expected = *dimension.get_or_insert(point.coordinates().len());
            if point.coordinates().len() != expected {
                return Err(PointsProviderError::InconsistentDimension {
                    line,
                    expected,
                    actual: point.coordinates().len(),
                });
            }
            points.push(point);
        }

        if points.len() != declared {
            return Err(PointsProviderError::CountMismatch {
                declared,
                found: points.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            dimension: dimension.unwrap_or_default(),
            points,
        })
    }

    /// Opens and parses the point file at `path`.
    ///
    /// # Errors
    /// Returns [`PointsProviderError::Io`] when the file cannot be read and
    /// any parse error from [`PointsProvider::try_from_reader`].
    #[instrument(name = "providers.points.load", err, skip(name, path), fields(path = %path.as_ref().display()))]
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, PointsProviderError> {
        let file = File::open(path.as_ref())?;
        let provider = Self::try_from_reader(name, BufReader::new(file))?;
        debug!(
            items = provider.points.len(),
            dimension = provider.dimension,
            "point file parsed"
        );
        Ok(provider)
    }

    /// Returns the data source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of coordinates per point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the parsed points in file order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Rescales every dimension to zero mean and unit variance.
    pub fn normalize(&mut self) -> ZScoreStats {
        z_score_normalize(&mut self.points)
    }

    /// Validates the points and packs them into a [`PointSet`].
    ///
    /// # Errors
    /// Returns [`PointsProviderError::DataSource`] when validation fails.
    pub fn into_point_set(self) -> Result<PointSet, PointsProviderError> {
        Ok(PointSet::try_new(self.name, self.points)?)
    }
}

fn parse_count(line: usize, text: &str) -> Result<usize, PointsProviderError> {
    text.parse().map_err(|_| PointsProviderError::InvalidCount {
        line,
        value: text.to_owned(),
    })
}

fn parse_record(line: usize, text: &str) -> Result<Point, PointsProviderError> {
    let (label, rest) = text
        .split_once('|')
        .ok_or(PointsProviderError::MissingSeparator { line })?;
    let label = label.trim();
    if label.is_empty() {
        return Err(PointsProviderError::EmptyLabel { line });
    }
    let coordinates = rest
        .split_whitespace()
        .map(|token| parse_coordinate(line, token))
        .collect::<Result<Vec<f32>, _>>()?;
    if coordinates.is_empty() {
        return Err(PointsProviderError::MissingCoordinates { line });
    }
    Ok(Point::new(label, coordinates))
}

fn parse_coordinate(line: usize, token: &str) -> Result<f32, PointsProviderError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PointsProviderError::InvalidCoordinate {
            line,
            value: token.to_owned(),
        })
}
