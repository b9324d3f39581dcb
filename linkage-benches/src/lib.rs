//! Benchmark support crate for linkage.
//!
//! Provides seeded synthetic data sources and parameter types used by the
//! Criterion benchmarks of pairwise table construction and the merge loop.

pub mod error;
pub mod params;
pub mod source;
