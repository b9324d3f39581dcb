//! Linkage core library.
//!
//! Agglomerative single-linkage clustering over squared Euclidean distances.
//! [`AgglomerativeBuilder`] configures a run, [`Agglomerative::run`] clusters
//! a [`DataSource`] down to the requested number of clusters and returns a
//! [`Partition`]; [`MergeEngine`] exposes the same algorithm one merge at a
//! time.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod agglomerative;
mod builder;
mod datasource;
mod engine;
mod error;
mod memory;
mod point;
pub mod quality;
mod result;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    agglomerative::Agglomerative,
    builder::{AgglomerativeBuilder, DEFAULT_CLUSTER_COUNT},
    datasource::DataSource,
    engine::{ClusterHandle, EngineState, MergeEngine, MergeStep, Members},
    error::{DataSourceError, DataSourceErrorCode, LinkageError, LinkageErrorCode, Result},
    memory::{estimate_peak_bytes, format_bytes},
    point::{Point, PointSet},
    quality::{QualityError, QualityReport},
    result::{Cluster, ClusterId, Partition},
};
