//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a clustering benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkageBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Cluster count the merge loop stops at.
    pub clusters: usize,
}

impl fmt::Display for LinkageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.point_count, self.clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_as_benchmark_id() {
        let params = LinkageBenchParams {
            point_count: 500,
            clusters: 8,
        };
        assert_eq!(params.to_string(), "n=500,k=8");
    }
}
