//! Sampling helpers for the blob generator.

use std::f32::consts::TAU;

use rand::{Rng, rngs::SmallRng};

use super::{BlobConfig, SyntheticError};

pub(super) fn validate(config: &BlobConfig) -> Result<usize, SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    if config.blob_count == 0 {
        return Err(SyntheticError::ZeroBlobs);
    }
    if config.blob_count > config.point_count {
        return Err(SyntheticError::BlobCountExceedsPointCount {
            blob_count: config.blob_count,
            point_count: config.point_count,
        });
    }
    check_float("separation", config.separation, false)?;
    check_float("spread", config.spread, true)?;
    config
        .point_count
        .checked_mul(config.dimensions)
        .ok_or(SyntheticError::Overflow)
}

fn check_float(parameter: &'static str, value: f32, allow_zero: bool) -> Result<(), SyntheticError> {
    let valid = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if valid {
        Ok(())
    } else {
        Err(SyntheticError::InvalidFloatParameter { parameter, value })
    }
}

/// Places blob centres evenly on a circle in the first two axes and jitters
/// the remaining axes.
pub(super) fn blob_centres(config: &BlobConfig, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    (0..config.blob_count)
        .map(|blob| {
            let angle = blob as f32 / config.blob_count as f32 * TAU;
            let jitter = 0.2 * config.separation;
            (0..config.dimensions)
                .map(|axis| match axis {
                    0 => config.separation * angle.cos(),
                    1 => config.separation * angle.sin(),
                    _ => rng.gen_range(-jitter..=jitter),
                })
                .collect()
        })
        .collect()
}

/// Draws one standard normal sample with the Box-Muller transform.
pub(super) fn standard_normal(rng: &mut SmallRng) -> f32 {
    let u1 = rng.gen_range(f32::EPSILON..1.0_f32);
    let u2 = rng.gen_range(0.0_f32..1.0_f32);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
