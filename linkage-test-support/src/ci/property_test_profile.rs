//! Property-test run profile read from the environment.
//!
//! Lets CI raise case counts or enable forking for every property suite in
//! the workspace without touching the suites.

use std::env;

use thiserror::Error;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "LINKAGE_PROPTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const FORK_ENV_KEY: &str = "LINKAGE_PBT_FORK";

/// Reasons an override is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// The case count was not a positive integer.
    #[error("expected a positive case count, got `{0}`")]
    InvalidCases(String),
    /// The fork flag was not a recognised boolean spelling.
    #[error("expected one of true/false/1/0/yes/no/on/off, got `{0}`")]
    InvalidFlag(String),
}

/// Case count and fork mode for a property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the given
    /// defaults when a variable is unset or invalid.
    ///
    /// # Examples
    /// ```
    /// use linkage_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_override(CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: read_override(FORK_ENV_KEY, parse_flag).unwrap_or(default_fork),
        }
    }

    /// Number of cases per property.
    #[rustfmt::skip]
    #[must_use]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[rustfmt::skip]
    #[must_use]
    pub fn fork(&self) -> bool { self.fork }
}

fn read_override<T>(key: &'static str, parse: fn(&str) -> Result<T, OverrideError>) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(&raw)
        .inspect_err(|error| {
            tracing::warn!(env = key, %error, "ignoring invalid property-test override");
        })
        .ok()
}

/// Parses a positive case count.
///
/// # Errors
/// Returns [`OverrideError::InvalidCases`] for zero or non-numeric input.
pub fn parse_cases(raw: &str) -> Result<u32, OverrideError> {
    match raw.trim().parse::<u32>() {
        Ok(cases) if cases > 0 => Ok(cases),
        _ => Err(OverrideError::InvalidCases(raw.to_owned())),
    }
}

/// Parses a boolean flag.
///
/// # Errors
/// Returns [`OverrideError::InvalidFlag`] for unrecognised spellings.
pub fn parse_flag(raw: &str) -> Result<bool, OverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OverrideError::InvalidFlag(raw.to_owned())),
    }
}
