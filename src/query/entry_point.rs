//! Entry point parsing
//!
//! An entry point is a `/` separated list of segments, each a field name with
//! an optional parenthesized predicate clause:
//!
//! ```text
//! allRouters(name:"ComboEast")/nodes/nodes(name:"east-combo")/nodes/arp/nodes
//! ```
//!
//! Parsing yields the dotted query path used to build the query tree, the
//! slash separated response path used to find result nodes in the response,
//! and the predicate clauses keyed by the tree location they attach to.
//! Clause text is never interpreted beyond stripping whitespace.

use super::{MARKER_PREFIX, PREDICATE_MARKER};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Root of every response path; query results live under the `data` key
pub const RESPONSE_ROOT: &str = "/data/";

/// Result of parsing an entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntryPoint {
    /// Dot separated traversal path with a trailing dot (e.g. "allRouters.nodes.")
    pub query_path: String,
    /// Slash separated response location (e.g. "/data/allRouters/nodes/")
    pub response_path: String,
    /// Attachment path (e.g. "allRouters.$predicate") -> normalized clause
    pub predicates: BTreeMap<String, String>,
}

impl Default for ParsedEntryPoint {
    fn default() -> Self {
        Self {
            query_path: String::new(),
            response_path: RESPONSE_ROOT.to_string(),
            predicates: BTreeMap::new(),
        }
    }
}

/// Parse an entry point into its query path, response path and predicates.
///
/// The empty expression parses to an empty query path and the bare response
/// root. Malformed expressions (empty segments, unbalanced delimiters, stray
/// text after a clause) are rejected.
pub fn parse_entry_point(expression: &str) -> Result<ParsedEntryPoint> {
    let mut parsed = ParsedEntryPoint::default();
    if expression.is_empty() {
        return Ok(parsed);
    }

    let invalid = |reason: String| Error::InvalidEntryPoint {
        entry_point: expression.to_string(),
        reason,
    };

    for segment in split_segments(expression).map_err(invalid)? {
        let (name, clause) = split_predicate(segment).map_err(invalid)?;

        parsed.query_path.push_str(name);
        parsed.query_path.push('.');
        parsed.response_path.push_str(name);
        parsed.response_path.push('/');

        if let Some(clause) = clause {
            let attach_at = format!("{}{}", parsed.query_path, PREDICATE_MARKER);
            parsed.predicates.insert(attach_at, normalize_predicate(clause));
        }
    }

    Ok(parsed)
}

/// Strip every whitespace character from a predicate clause
pub fn normalize_predicate(clause: &str) -> String {
    clause.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split on `/` occurring outside of clauses and quoted strings
fn split_segments(expression: &str) -> std::result::Result<Vec<&str>, String> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (idx, ch) in top_level(expression)? {
        if ch == '/' {
            segments.push(&expression[start..idx]);
            start = idx + 1;
        }
    }
    segments.push(&expression[start..]);

    if segments.iter().any(|s| s.is_empty()) {
        return Err("empty path segment".to_string());
    }
    Ok(segments)
}

/// Separate a segment into its field name and optional clause (delimiters included)
fn split_predicate(segment: &str) -> std::result::Result<(&str, Option<&str>), String> {
    let events = top_level(segment)?;

    let Some(open) = events.iter().position(|(_, ch)| matches!(ch, '(' | '[')) else {
        validate_field_name(segment)?;
        return Ok((segment, None));
    };

    let (start, delimiter) = events[open];
    if delimiter == '[' {
        return Err(format!(
            "unexpected '[' in segment '{}', predicate clauses use parentheses",
            segment
        ));
    }

    let name = &segment[..start];
    if name.is_empty() {
        return Err(format!("predicate clause without a field name in '{}'", segment));
    }
    validate_field_name(name)?;

    // balanced input guarantees the matching close is the next top level event
    let (end, _) = events[open + 1];
    if open + 2 < events.len() {
        return Err(format!("unexpected text after predicate clause in '{}'", segment));
    }

    let clause = &segment[start..=end];
    if normalize_predicate(&clause[1..clause.len() - 1]).is_empty() {
        return Err(format!("empty predicate clause in '{}'", segment));
    }

    Ok((name, Some(clause)))
}

fn validate_field_name(name: &str) -> std::result::Result<(), String> {
    if name.starts_with(MARKER_PREFIX) {
        return Err(format!(
            "field name '{}' uses the reserved '{}' prefix",
            name, MARKER_PREFIX
        ));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '.' | '{' | '}' | ':' | ','))
    {
        return Err(format!("unexpected '{}' in field name '{}'", ch, name));
    }
    Ok(())
}

/// Characters that sit outside every bracket pair and quoted string, with
/// their byte offsets. Opening delimiters are reported when they open a top
/// level group and closing delimiters when they close one.
fn top_level(text: &str) -> std::result::Result<Vec<(usize, char)>, String> {
    let mut events = Vec::new();
    let mut open: Vec<char> = Vec::new();
    let mut quoted = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if quoted {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                quoted = false;
            }
            continue;
        }

        match ch {
            '"' if open.is_empty() => {
                return Err(format!("unexpected quote at offset {}", idx));
            }
            '"' => quoted = true,
            '(' | '[' => {
                if open.is_empty() {
                    events.push((idx, ch));
                }
                open.push(ch);
            }
            ')' | ']' => {
                let expected = if ch == ')' { '(' } else { '[' };
                match open.pop() {
                    Some(opener) if opener == expected => {
                        if open.is_empty() {
                            events.push((idx, ch));
                        }
                    }
                    _ => return Err(format!("unmatched '{}' at offset {}", ch, idx)),
                }
            }
            _ if open.is_empty() => events.push((idx, ch)),
            _ => {}
        }
    }

    if quoted {
        return Err("unterminated quoted string".to_string());
    }
    if let Some(opener) = open.last() {
        return Err(format!("unterminated '{}'", opener));
    }
    Ok(events)
}
