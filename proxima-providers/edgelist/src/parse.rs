//! Line-level parsing of edge-list records.

use crate::errors::EdgeListError;

/// Raw measurement recorded for an edge whose distance is unknown.
pub(crate) const UNKNOWN: i64 = -1;

/// A single meaningful line of an edge list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Record<'a> {
    /// A node declared without edges.
    Node(&'a str),
    /// An edge; `None` when its distance is unknown.
    Edge {
        left: &'a str,
        right: &'a str,
        distance: Option<u64>,
    },
}

/// Parses the text of line `line` (1-based).
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub(crate) fn parse_line(line: usize, text: &str) -> Result<Option<Record<'_>>, EdgeListError> {
    let content = text.split_once('#').map_or(text, |(before, _)| before);
    let fields: Vec<&str> = content.split_whitespace().collect();
    match fields.as_slice() {
        [] => Ok(None),
        [node] => Ok(Some(Record::Node(*node))),
        [left, right, _] if left == right => Err(EdgeListError::SelfLoop {
            line,
            node: (*left).to_owned(),
        }),
        [left, right, distance] => Ok(Some(Record::Edge {
            left: *left,
            right: *right,
            distance: parse_distance(line, distance)?,
        })),
        _ => Err(EdgeListError::MalformedLine {
            line,
            fields: fields.len(),
        }),
    }
}

/// Reads a distance, where `-`, `?` and negative measurements are unknown.
fn parse_distance(line: usize, value: &str) -> Result<Option<u64>, EdgeListError> {
    if matches!(value, "-" | "?") {
        return Ok(None);
    }
    if let Ok(distance) = value.parse::<u64>() {
        return Ok(Some(distance));
    }
    match value.parse::<i64>() {
        Ok(raw) if raw < 0 => Ok(None),
        _ => Err(EdgeListError::InvalidDistance {
            line,
            value: value.to_owned(),
        }),
    }
}
