//! Query tree serialization
//!
//! Walks the tree in pre-order with keys in ascending byte order. A node's
//! marker keys are written before any of its selections, so a predicate
//! clause always sits right before the brace opening its selection set.

use super::tree::{QueryNode, QueryTree};
use super::MARKER_PREFIX;
use std::collections::BTreeMap;

/// Serialize a tree into the selection text following `query `
pub fn serialize(tree: &QueryTree) -> String {
    let mut out = String::new();
    write_selections(tree.root(), &mut out);
    out
}

/// Full query document for a tree
pub fn build_query(tree: &QueryTree) -> String {
    format!("query {}", serialize(tree))
}

fn write_selections(children: &BTreeMap<String, QueryNode>, out: &mut String) {
    let (markers, selections): (Vec<_>, Vec<_>) = children
        .iter()
        .partition(|(key, _)| key.starts_with(MARKER_PREFIX));

    for (_, node) in markers {
        if let QueryNode::Leaf(clause) = node {
            out.push_str(clause);
        }
    }

    if selections.is_empty() {
        return;
    }

    out.push('{');
    for (key, node) in selections {
        out.push('\n');
        out.push_str(key);

        if let QueryNode::Branch(grandchildren) = node {
            write_selections(grandchildren, out);
        }
    }
    out.push('}');
}
