//! Intermediate query tree
//!
//! Predicates, fields and tags are all inserted into one tree keyed by the
//! segments of their dotted paths. The tree is content addressed, so the
//! order in which the three sources are inserted does not matter.

use super::MARKER_PREFIX;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// A node of the query tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Scalar selection name, or clause text under a marker key
    Leaf(String),
    /// Nested selection set
    Branch(BTreeMap<String, QueryNode>),
}

impl QueryNode {
    /// Whether this node is selected as a plain scalar
    pub fn is_leaf(&self) -> bool {
        matches!(self, QueryNode::Leaf(_))
    }

    fn describe(&self) -> String {
        match self {
            QueryNode::Leaf(value) => value.clone(),
            QueryNode::Branch(children) => {
                let selections: Vec<&str> = children
                    .keys()
                    .filter(|k| !k.starts_with(MARKER_PREFIX))
                    .map(String::as_str)
                    .collect();
                format!("{{{}}}", selections.join(","))
            }
        }
    }
}

/// Nested map of selections rooted at the query's outer selection set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTree {
    root: BTreeMap<String, QueryNode>,
}

impl QueryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top level selections
    pub fn root(&self) -> &BTreeMap<String, QueryNode> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Look up the node at a dotted path
    pub fn get(&self, path: &str) -> Option<&QueryNode> {
        let mut segments = path.split('.').filter(|s| !s.is_empty());
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                QueryNode::Branch(children) => node = children.get(segment)?,
                QueryNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Set `value` as the leaf at dotted `path`, creating intermediate nodes.
    ///
    /// Inserting the same value twice is a no-op. Any other collision, such as
    /// a second value at one leaf or a leaf and a selection set sharing a
    /// location, is rejected with both sides named.
    pub fn insert(&mut self, path: &str, value: &str) -> Result<()> {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::InvalidPath {
                name: value.to_string(),
                path: path.to_string(),
                reason: "query path is empty".to_string(),
            });
        };

        let mut level = &mut self.root;
        let mut walked = String::new();
        for segment in parents {
            walked.push_str(segment);
            let node = level
                .entry(segment.to_string())
                .or_insert_with(|| QueryNode::Branch(BTreeMap::new()));
            level = match node {
                QueryNode::Branch(children) => children,
                QueryNode::Leaf(existing) => {
                    return Err(Error::ConflictingPath {
                        path: walked,
                        existing: existing.clone(),
                        incoming: path.to_string(),
                    });
                }
            };
            walked.push('.');
        }
        walked.push_str(last);

        match level.get(*last) {
            None => {
                level.insert(last.to_string(), QueryNode::Leaf(value.to_string()));
                Ok(())
            }
            Some(QueryNode::Leaf(existing)) if existing == value => Ok(()),
            Some(existing) => Err(Error::ConflictingPath {
                path: walked,
                existing: existing.describe(),
                incoming: value.to_string(),
            }),
        }
    }

    /// Insert `attachment path -> clause` predicate bindings
    pub fn insert_predicates(&mut self, predicates: &BTreeMap<String, String>) -> Result<()> {
        self.insert_all(predicates)
    }

    /// Insert `query path -> selection name` field entries
    pub fn insert_fields(&mut self, fields: &BTreeMap<String, String>) -> Result<()> {
        self.insert_all(fields)
    }

    /// Insert `query path -> selection name` tag entries
    pub fn insert_tags(&mut self, tags: &BTreeMap<String, String>) -> Result<()> {
        self.insert_all(tags)
    }

    fn insert_all(&mut self, entries: &BTreeMap<String, String>) -> Result<()> {
        for (path, value) in entries {
            self.insert(path, value)?;
        }
        Ok(())
    }
}
