//! Compile path expressions into GraphQL queries and project the responses
//! into flat, named records.
//!
//! An entry point such as
//! `allRouters(name:"ComboEast")/nodes/nodes(name:"east-combo")/nodes/arp/nodes`
//! together with `output -> source path` maps for fields and tags is compiled
//! once into a query document. Replies are reduced to one
//! [`ProjectedRecord`] per result node.

pub mod collector;
pub mod config;
pub mod error;
pub mod query;
pub mod response;

pub use collector::{Accumulator, Collector, GatherResult, GraphqlRequest, RawResponse, Transport};
pub use config::CollectorConfig;
pub use error::{Error, Result};
pub use query::{compile, CompiledQuery};
pub use response::{project, FieldValue, ProjectedRecord};
