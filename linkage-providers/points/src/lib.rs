//! Point-file provider: parses labelled coordinate records into a
//! [`linkage_core::PointSet`], with optional z-score normalisation.

mod errors;
mod normalize;
mod provider;

pub use errors::PointsProviderError;
pub use normalize::{ZScoreStats, z_score_normalize};
pub use provider::PointsProvider;
