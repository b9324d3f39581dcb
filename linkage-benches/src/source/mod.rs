//! Seeded synthetic point clouds for benchmarking.

mod errors;
mod generation;

pub use errors::SyntheticError;

use linkage_core::{DataSource, DataSourceError};
use rand::{SeedableRng, rngs::SmallRng};

/// Configuration for isotropic Gaussian blobs.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each point.
    pub dimensions: usize,
    /// Number of Gaussian blobs.
    pub blob_count: usize,
    /// Radius of the circle the blob centres sit on.
    pub separation: f32,
    /// Standard deviation of every blob along every axis.
    pub spread: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Flat, row-major point cloud implementing [`DataSource`].
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    data: Vec<f32>,
    point_count: usize,
    dimensions: usize,
    blobs: Vec<usize>,
}

impl SyntheticSource {
    /// Generates Gaussian blobs, assigning points to blobs round-robin.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    pub fn gaussian_blobs(config: &BlobConfig) -> Result<Self, SyntheticError> {
        let total = generation::validate(config)?;
        let centres = generation::blob_centres(config, &mut SmallRng::seed_from_u64(config.seed));
        let mut rng = SmallRng::seed_from_u64(config.seed.rotate_left(32));

        let mut data = Vec::with_capacity(total);
        let mut blobs = Vec::with_capacity(config.point_count);
        for (blob, centre) in centres.iter().enumerate().cycle().take(config.point_count) {
            blobs.push(blob);
            data.extend(
                centre
                    .iter()
                    .map(|value| value + generation::standard_normal(&mut rng) * config.spread),
            );
        }

        Ok(Self {
            data,
            point_count: config.point_count,
            dimensions: config.dimensions,
            blobs,
        })
    }

    /// Returns the blob each point was drawn from.
    #[must_use]
    pub fn blobs(&self) -> &[usize] {
        &self.blobs
    }
}

impl DataSource for SyntheticSource {
    #[rustfmt::skip]
    fn len(&self) -> usize { self.point_count }

    #[rustfmt::skip]
    fn name(&self) -> &str { "synthetic-gaussian-blobs" }

    #[rustfmt::skip]
    fn dimension(&self) -> usize { self.dimensions }

    fn point(&self, index: usize) -> Result<&[f32], DataSourceError> {
        let start = index
            .checked_mul(self.dimensions)
            .ok_or(DataSourceError::OutOfBounds { index })?;
        let end = start
            .checked_add(self.dimensions)
            .ok_or(DataSourceError::OutOfBounds { index })?;
        self.data
            .get(start..end)
            .ok_or(DataSourceError::OutOfBounds { index })
    }
}

#[cfg(test)]
mod tests;
