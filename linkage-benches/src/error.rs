//! Benchmark setup error type.
//!
//! Lets setup functions propagate generator and clustering failures with
//! `?` instead of panicking mid-measurement.

use linkage_core::LinkageError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Configuring or running the clustering failed.
    #[error("clustering failed: {0}")]
    Linkage(#[from] LinkageError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// Parameter that was unexpectedly zero.
        context: &'static str,
    },
}
