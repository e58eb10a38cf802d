#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Data source fetching, failover, classification, and normalization logic.
//!
//! Each data source is described by a config-driven
//! [`SourceDefinition`](gridmap_source_models::SourceDefinition) from the
//! embedded [`registry`]. The [`failover`] fetcher walks a source's
//! endpoints in order, the per-kind parsers ([`overpass`], [`boundary`],
//! [`subdivision`]) turn payloads into intermediate records, [`classify`]
//! assigns entity types, and [`normalize`] maps classified records to the
//! unified output schema.

pub mod boundary;
pub mod classify;
pub mod failover;
pub mod fields;
pub mod normalize;
pub mod overpass;
pub mod registry;
pub mod sampler;
pub mod subdivision;
pub mod transport;

/// Errors that can occur during data source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection error, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP status {status}")]
    Status {
        /// The status code returned by the endpoint.
        status: reqwest::StatusCode,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Every candidate endpoint for one source was exhausted.
    #[error("all {attempted} endpoint(s) failed for source `{source_id}`")]
    AllEndpointsFailed {
        /// Id of the source whose endpoints were exhausted.
        source_id: String,
        /// Number of endpoints that were tried.
        attempted: usize,
    },

    /// A source definition is malformed.
    #[error("source config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
