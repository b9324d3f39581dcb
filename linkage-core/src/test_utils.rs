//! Shared test utilities for `linkage-core`.

use linkage_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    datasource::{DataSource, squared_euclidean},
    error::DataSourceError,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// Keeps property suites aligned on the same `LINKAGE_PROPTEST_CASES` and
/// `LINKAGE_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// [`DataSource`] over raw rows that counts scalar distance evaluations.
///
/// Rows are not validated, so tests can feed ragged or non-finite input to
/// exercise the default distance checks.
#[derive(Clone)]
pub(crate) struct CountingSource {
    rows: Vec<Vec<f32>>,
    calls: Arc<AtomicUsize>,
    name: &'static str,
}

impl CountingSource {
    /// Creates a counting source with the default "counting" name.
    #[must_use]
    pub(crate) fn new(rows: Vec<Vec<f32>>, calls: Arc<AtomicUsize>) -> Self {
        Self::with_name("counting", rows, calls)
    }

    /// Creates a counting source with a specific display name.
    #[must_use]
    pub(crate) fn with_name(name: &'static str, rows: Vec<Vec<f32>>, calls: Arc<AtomicUsize>) -> Self {
        Self { rows, calls, name }
    }

    /// Returns the backing distance counter for assertions.
    #[must_use]
    pub(crate) fn calls(&self) -> &Arc<AtomicUsize> {
        &self.calls
    }
}

impl DataSource for CountingSource {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn dimension(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn point(&self, index: usize) -> Result<&[f32], DataSourceError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DataSourceError::OutOfBounds { index })
    }

    fn squared_distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        squared_euclidean((i, self.point(i)?), (j, self.point(j)?))
    }
}
