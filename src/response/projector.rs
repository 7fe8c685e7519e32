//! Projection of response nodes into flat records
//!
//! Each response node becomes one record of renamed fields and tags. A field
//! that cannot be resolved fails the whole batch; a tag that cannot be
//! resolved becomes an empty string.

use super::path_extractor::{resolve, value_to_string};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Typed value of a projected field; integers keep their full width
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Boolean(bool),
}

/// Fields and tags projected from one response node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectedRecord {
    pub fields: BTreeMap<String, FieldValue>,
    pub tags: BTreeMap<String, String>,
}

/// Project response nodes using `output name -> source path` maps.
///
/// # Arguments
/// * `nodes` - Result nodes, in response order
/// * `collector` - Collector name, used in error messages
/// * `fields` - Field output name -> source path within a node
/// * `tags` - Tag output name -> source path within a node
///
/// # Returns
/// One record per node in the same order, or the first field error
pub fn project(
    nodes: &[&Value],
    collector: &str,
    fields: &BTreeMap<String, String>,
    tags: &BTreeMap<String, String>,
) -> Result<Vec<ProjectedRecord>> {
    nodes
        .iter()
        .map(|node| project_node(node, collector, fields, tags))
        .collect()
}

fn project_node(
    node: &Value,
    collector: &str,
    fields: &BTreeMap<String, String>,
    tags: &BTreeMap<String, String>,
) -> Result<ProjectedRecord> {
    let mut record = ProjectedRecord::default();

    for (renamed, source) in fields {
        let value = resolve(node, source).ok_or_else(|| Error::EmptyField {
            collector: collector.to_string(),
            field: source.clone(),
        })?;
        record
            .fields
            .insert(renamed.clone(), field_value(value, collector, source)?);
    }

    for (renamed, source) in tags {
        let tag = resolve(node, source).map(value_to_string).unwrap_or_default();
        record.tags.insert(renamed.clone(), tag);
    }

    Ok(record)
}

fn field_value(value: &Value, collector: &str, source: &str) -> Result<FieldValue> {
    let unsupported = || Error::UnsupportedField {
        collector: collector.to_string(),
        field: source.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(FieldValue::Integer(i))
            } else if let Some(u) = n.as_u64() {
                Ok(FieldValue::Unsigned(u))
            } else {
                n.as_f64().map(FieldValue::Float).ok_or_else(unsupported)
            }
        }
        Value::String(s) => Ok(FieldValue::String(s.clone())),
        Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(unsupported()),
    }
}
