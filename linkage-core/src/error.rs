//! Error types for the linkage core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// Compared points had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand point.
        left: usize,
        /// Dimensionality of the right-hand point.
        right: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point {index} has a non-finite coordinate at dimension {dimension}: {value}")]
    NonFinite {
        /// Index of the offending point.
        index: usize,
        /// Dimension holding the offending value.
        dimension: usize,
        /// The rejected value.
        value: f32,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source points must have positive dimension")]
    ZeroDimension,
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// Compared points had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DATA_SOURCE_DIMENSION_MISMATCH",
        /// A coordinate was NaN or infinite.
        NonFinite => NonFinite { .. } => "DATA_SOURCE_NON_FINITE",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
    }
}

/// Error type produced when configuring or running [`crate::Agglomerative`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinkageError {
    /// The requested number of clusters must be greater than zero.
    #[error("cluster_count must be at least 1 (got {got})")]
    InvalidClusterCount {
        /// The invalid cluster count supplied by the caller.
        got: usize,
    },
    /// The supplied [`crate::DataSource`] contained no items.
    #[error("data source `{data_source}` contains no items")]
    EmptySource {
        /// Identifier for the empty data source.
        data_source: Arc<str>,
    },
    /// More clusters were requested than the source has items.
    #[error("data source `{data_source}` has {items} items but {requested} clusters were requested")]
    TooManyClusters {
        /// Identifier for the data source.
        data_source: Arc<str>,
        /// Number of items available in the data source.
        items: usize,
        /// Cluster count requested by the caller.
        requested: usize,
    },
    /// The pre-flight memory estimate exceeded the configured limit.
    #[error("estimated peak memory of {estimated} bytes exceeds the limit of {limit} bytes")]
    MemoryLimitExceeded {
        /// Estimated peak bytes for the run.
        estimated: u64,
        /// Limit configured on the builder.
        limit: u64,
    },
    /// A working structure could not be allocated.
    #[error("failed to allocate {bytes} bytes for the {structure}")]
    ResourceExhausted {
        /// Name of the structure that could not be allocated.
        structure: &'static str,
        /// Requested allocation size, saturated at `u64::MAX`.
        bytes: u64,
    },
    /// A [`crate::DataSource`] operation failed while running the algorithm.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error bubbled up by the algorithm.
        error: DataSourceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`LinkageError`] variants.
    enum LinkageErrorCode for LinkageError {
        /// The requested number of clusters must be greater than zero.
        InvalidClusterCount => InvalidClusterCount { .. } => "LINKAGE_INVALID_CLUSTER_COUNT",
        /// The supplied [`crate::DataSource`] contained no items.
        EmptySource => EmptySource { .. } => "LINKAGE_EMPTY_SOURCE",
        /// More clusters were requested than the source has items.
        TooManyClusters => TooManyClusters { .. } => "LINKAGE_TOO_MANY_CLUSTERS",
        /// The pre-flight memory estimate exceeded the configured limit.
        MemoryLimitExceeded => MemoryLimitExceeded { .. } => "LINKAGE_MEMORY_LIMIT_EXCEEDED",
        /// A working structure could not be allocated.
        ResourceExhausted => ResourceExhausted { .. } => "LINKAGE_RESOURCE_EXHAUSTED",
        /// A [`crate::DataSource`] operation failed while running the algorithm.
        DataSourceFailure => DataSource { .. } => "LINKAGE_DATA_SOURCE_FAILURE",
    }
}

impl LinkageError {
    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a [`crate::DataSource`].
    #[must_use]
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn data_source(name: &str, error: DataSourceError) -> Self {
        Self::DataSource {
            data_source: Arc::from(name),
            error,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, LinkageError>;
