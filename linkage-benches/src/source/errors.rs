//! Error types for synthetic benchmark data generation.

/// Errors that may occur while preparing benchmark data sources.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The requested blob count was zero.
    #[error("blob count must be greater than zero")]
    ZeroBlobs,
    /// More blobs were requested than points.
    #[error("blob count ({blob_count}) must not exceed point count ({point_count})")]
    BlobCountExceedsPointCount {
        /// Number of blobs requested.
        blob_count: usize,
        /// Number of points requested.
        point_count: usize,
    },
    /// The requested `point_count * dimensions` overflowed `usize`.
    #[error("point_count * dimensions overflows usize")]
    Overflow,
    /// A floating-point generator parameter was negative or non-finite.
    #[error("invalid floating-point parameter `{parameter}`: {value}")]
    InvalidFloatParameter {
        /// Name of the invalid parameter.
        parameter: &'static str,
        /// Value supplied by the caller.
        value: f32,
    },
}
