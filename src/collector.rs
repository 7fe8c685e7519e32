//! Collector pipeline
//!
//! A collector compiles its configuration once, then on every gather sends
//! the query through a [`Transport`], locates the result nodes in the reply
//! and hands projected records to an [`Accumulator`].
//!
//! Transport and accumulation are external concerns; only their interfaces
//! live here.

use crate::config::CollectorConfig;
use crate::error::{Error, Result};
use crate::query::{compile, CompiledQuery};
use crate::response::{decode_errors, locate_nodes, project, ProjectedRecord};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, SystemTime};
use tracing::{debug, trace, warn};

/// A query ready to be posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlRequest {
    pub url: String,
    pub unix_socket: Option<String>,
    pub timeout: Duration,
    /// JSON request body, `{"query": "..."}`
    pub body: String,
}

/// Status and body of an endpoint reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the endpoint.
///
/// Implementations own dialing, timeouts and retries.
pub trait Transport: Send + Sync {
    fn send(&self, request: &GraphqlRequest) -> anyhow::Result<RawResponse>;
}

/// Receives the outcome of a gather
pub trait Accumulator {
    fn add_record(&mut self, measurement: &str, record: ProjectedRecord, timestamp: SystemTime);
    fn add_error(&mut self, error: Error);
}

/// Records from one reply, or every error the reply produced
pub type GatherResult = std::result::Result<Vec<ProjectedRecord>, Vec<Error>>;

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
}

/// A compiled collector; immutable once constructed
#[derive(Debug, Clone)]
pub struct Collector {
    config: CollectorConfig,
    compiled: CompiledQuery,
}

impl Collector {
    /// Validate the configuration and compile its entry point
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let config = config.validate()?;
        let compiled = compile(
            &config.entry_point,
            &config.extract_fields,
            &config.extract_tags,
        )?;

        debug!(
            "Created collector '{}' reading {} from {}",
            config.collector_name, compiled.entry_point.response_path, config.base_url
        );
        for (name, source) in config.extract_fields.iter().chain(config.extract_tags.iter()) {
            trace!(
                "Collector '{}' maps {}{} to {}",
                config.collector_name,
                compiled.entry_point.response_path,
                source,
                name
            );
        }

        Ok(Self { config, compiled })
    }

    pub fn name(&self) -> &str {
        &self.config.collector_name
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn compiled(&self) -> &CompiledQuery {
        &self.compiled
    }

    /// Query document sent on every gather
    pub fn query(&self) -> &str {
        &self.compiled.query
    }

    /// Build the request for this collector's query
    pub fn request(&self) -> Result<GraphqlRequest> {
        let body = serde_json::to_string(&RequestBody {
            query: &self.compiled.query,
        })
        .map_err(|source| Error::RequestBody {
            query: self.compiled.query.clone(),
            source,
        })?;

        Ok(GraphqlRequest {
            url: self.config.base_url.clone(),
            unix_socket: self.config.unix_socket.clone(),
            timeout: self.config.timeout(),
            body,
        })
    }

    /// Send the query and turn a reply into records
    pub fn fetch(&self, transport: &dyn Transport) -> GatherResult {
        let request = self.request().map_err(|e| vec![e])?;
        debug!("Sending query for collector '{}' to {}", self.name(), request.url);

        let response = transport.send(&request).map_err(|source| {
            vec![Error::Request {
                collector: self.name().to_string(),
                source,
            }]
        })?;
        trace!(
            "Collector '{}' received status {} with {} bytes",
            self.name(),
            response.status,
            response.body.len()
        );

        self.process(&response)
    }

    /// Turn an endpoint reply into records
    pub fn process(&self, response: &RawResponse) -> GatherResult {
        let collector = self.name().to_string();

        if !response.is_success() {
            warn!(
                "Collector '{}' received status {}",
                collector, response.status
            );
            return Err(decode_errors(&response.body)
                .into_iter()
                .map(|message| Error::Status {
                    status: response.status,
                    collector: collector.clone(),
                    message,
                })
                .collect());
        }

        let json: Value = serde_json::from_str(&response.body).map_err(|source| {
            vec![Error::InvalidJson {
                collector: collector.clone(),
                source,
            }]
        })?;

        let Some(nodes) = locate_nodes(&json, &self.compiled.entry_point.response_path) else {
            warn!(
                "Collector '{}' response has no data at {}",
                collector, self.compiled.entry_point.response_path
            );
            return Err(decode_errors(&response.body)
                .into_iter()
                .map(|message| Error::UnexpectedResponse {
                    collector: collector.clone(),
                    message,
                })
                .collect());
        };

        project(
            &nodes,
            &collector,
            &self.config.extract_fields,
            &self.config.extract_tags,
        )
        .map_err(|e| vec![e])
    }

    /// Fetch once and report records and errors to the accumulator
    pub fn gather(&self, transport: &dyn Transport, acc: &mut dyn Accumulator) {
        let timestamp = SystemTime::now();

        match self.fetch(transport) {
            Ok(records) => {
                debug!(
                    "Collector '{}' gathered {} records",
                    self.name(),
                    records.len()
                );
                for record in records {
                    acc.add_record(self.name(), record, timestamp);
                }
            }
            Err(errors) => {
                for error in errors {
                    acc.add_error(error);
                }
            }
        }
    }
}
