//! Rewriting relative field/tag paths against a parsed entry point
//!
//! Fields and tags are configured as `output name -> relative source path`,
//! with `/` separating nested keys. Query building needs them as absolute
//! dotted tree paths, while response handling addresses them by absolute
//! response location. The caller picks which one it wants.

use super::MARKER_PREFIX;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Which consumer a rewritten map is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `query path + dotted source -> selection name`, insertable into a query tree
    Query,
    /// `response path + source -> output name`
    Response,
}

/// Rewrite an `output name -> relative path` map against `base`.
///
/// With [`Direction::Query`] the base is a dotted query path and the values
/// become the leaf selection names. With [`Direction::Response`] the base is
/// a response path and the map is flipped so that absolute source locations
/// point back at their output names. Two outputs reading the same source are
/// rejected in that direction since the flipped map could only keep one.
pub fn rewrite(
    relative: &BTreeMap<String, String>,
    base: &str,
    direction: Direction,
) -> Result<BTreeMap<String, String>> {
    let mut rewritten: BTreeMap<String, String> = BTreeMap::new();

    for (name, path) in relative {
        let segments = split_relative(name, path)?;

        let (key, value) = match direction {
            Direction::Query => {
                let leaf = segments.last().copied().unwrap_or_default();
                (format!("{}{}", base, segments.join(".")), leaf.to_string())
            }
            Direction::Response => (format!("{}{}", base, path), name.clone()),
        };

        if direction == Direction::Response {
            if let Some(existing) = rewritten.get(&key) {
                return Err(Error::InvalidPath {
                    name: name.clone(),
                    path: path.clone(),
                    reason: format!("source is already read by '{}'", existing),
                });
            }
        }
        rewritten.insert(key, value);
    }

    Ok(rewritten)
}

/// Validate a relative source path and split it into its segments
fn split_relative<'a>(name: &str, path: &'a str) -> Result<Vec<&'a str>> {
    let invalid = |reason: &str| Error::InvalidPath {
        name: name.to_string(),
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }

    let segments: Vec<&str> = path.split('/').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(invalid("path has an empty segment"));
        }
        if segment.starts_with(MARKER_PREFIX) {
            return Err(invalid("segments may not use the reserved '$' prefix"));
        }
        if segment.contains('.') || segment.chars().any(char::is_whitespace) {
            return Err(invalid("segments may not contain '.' or whitespace"));
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_rewrite_for_response() {
        let fields = map(&[("test-field", "test-field")]);
        let tags = map(&[("test-tag", "test-tag")]);
        let base = "/data/allRouters/nodes/nodes/nodes/arp/nodes/";

        assert_eq!(
            rewrite(&fields, base, Direction::Response).unwrap(),
            map(&[(
                "/data/allRouters/nodes/nodes/nodes/arp/nodes/test-field",
                "test-field"
            )])
        );
        assert_eq!(
            rewrite(&tags, base, Direction::Response).unwrap(),
            map(&[(
                "/data/allRouters/nodes/nodes/nodes/arp/nodes/test-tag",
                "test-tag"
            )])
        );
    }

    #[test]
    fn test_rewrite_for_query() {
        let tags = map(&[
            ("test-tag-1", "test-tag-1"),
            ("renamed", "state1/state2/test-tag-2"),
        ]);

        let rewritten = rewrite(&tags, "allRouters.nodes.", Direction::Query).unwrap();

        assert_eq!(
            rewritten,
            map(&[
                ("allRouters.nodes.test-tag-1", "test-tag-1"),
                ("allRouters.nodes.state1.state2.test-tag-2", "test-tag-2"),
            ])
        );
    }

    #[test]
    fn test_query_direction_allows_shared_source() {
        let fields = map(&[("a", "value"), ("b", "value")]);

        let rewritten = rewrite(&fields, "root.", Direction::Query).unwrap();
        assert_eq!(rewritten, map(&[("root.value", "value")]));
    }

    #[test]
    fn test_response_direction_rejects_shared_source() {
        let fields = map(&[("a", "value"), ("b", "value")]);

        let err = rewrite(&fields, "/data/root/", Direction::Response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid path 'value' for b: source is already read by 'a'"
        );
    }

    #[test]
    fn test_rejects_invalid_relative_paths() {
        for path in ["", "a//b", "/a", "a/", "$predicate", "a/$name", "a.b", "a b"] {
            let fields = map(&[("out", path)]);
            assert!(
                rewrite(&fields, "root.", Direction::Query).is_err(),
                "expected rejection for {:?}",
                path
            );
        }
    }
}
