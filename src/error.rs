//! Error types for entry point compilation, query building and response projection

use thiserror::Error;

/// Errors surfaced while compiling a collector or processing its responses
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is a required configuration field")]
    MissingConfig(&'static str),

    #[error("invalid entry point '{entry_point}': {reason}")]
    InvalidEntryPoint { entry_point: String, reason: String },

    #[error("invalid path '{path}' for {name}: {reason}")]
    InvalidPath {
        name: String,
        path: String,
        reason: String,
    },

    #[error("conflicting query paths at '{path}': '{existing}' and '{incoming}'")]
    ConflictingPath {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("failed to create request body for query '{query}': {source}")]
    RequestBody {
        query: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to make graphQL request for collector {collector}: {source}")]
    Request {
        collector: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("status code {status} not OK for collector {collector}: {message}")]
    Status {
        status: u16,
        collector: String,
        message: String,
    },

    #[error("invalid json response for collector {collector}: {source}")]
    InvalidJson {
        collector: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response for collector {collector}: {message}")]
    UnexpectedResponse { collector: String, message: String },

    #[error("found empty data for collector {collector}: field {field}")]
    EmptyField { collector: String, field: String },

    #[error("unsupported data type for collector {collector}: field {field}")]
    UnsupportedField { collector: String, field: String },
}

pub type Result<T> = std::result::Result<T, Error>;
