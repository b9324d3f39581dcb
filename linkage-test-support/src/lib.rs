//! Shared test utilities used across linkage crates.

pub mod ci;
pub mod tracing;
