//! Entry point compilation
//!
//! Turns an entry point plus field/tag maps into the query text sent to the
//! endpoint and the response path used to find result nodes in the reply.

pub mod entry_point;
pub mod path_rewriter;
pub mod serializer;
pub mod tree;

pub use entry_point::{normalize_predicate, parse_entry_point, ParsedEntryPoint, RESPONSE_ROOT};
pub use path_rewriter::{rewrite, Direction};
pub use serializer::{build_query, serialize};
pub use tree::{QueryNode, QueryTree};

use crate::error::Result;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Leading character of every marker key in the query tree
pub const MARKER_PREFIX: char = '$';

/// Marker key a segment's predicate clause is attached under
pub const PREDICATE_MARKER: &str = "$predicate";

/// Everything derived from an entry point at configuration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub entry_point: ParsedEntryPoint,
    /// Complete query document
    pub query: String,
}

/// Compile an entry point with its `output -> relative path` field and tag maps
pub fn compile(
    entry_point: &str,
    fields: &BTreeMap<String, String>,
    tags: &BTreeMap<String, String>,
) -> Result<CompiledQuery> {
    let parsed = parse_entry_point(entry_point)?;

    let mut tree = QueryTree::new();
    tree.insert_predicates(&parsed.predicates)?;
    tree.insert_fields(&rewrite(fields, &parsed.query_path, Direction::Query)?)?;
    tree.insert_tags(&rewrite(tags, &parsed.query_path, Direction::Query)?)?;


    let query = build_query(&tree);
    debug!(
        "Compiled entry point '{}': {} predicates, {} fields, {} tags",
        entry_point,
        parsed.predicates.len(),
        fields.len(),
        tags.len()
    );
    trace!("Query text: {}", query);

    Ok(CompiledQuery {
        entry_point: parsed,
        query,
    })
}
