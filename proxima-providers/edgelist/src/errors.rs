use thiserror::Error;

/// Error raised while loading an edge list.
///
/// Every variant tied to a specific record carries its 1-based line number.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EdgeListError {
    #[error("line {line}: expected `node` or `left right distance` but found {fields} fields")]
    MalformedLine { line: usize, fields: usize },
    #[error("line {line}: distance `{value}` is not an integer, `-` or `?`")]
    InvalidDistance { line: usize, value: String },
    #[error("line {line}: node `{node}` cannot have an edge to itself")]
    SelfLoop { line: usize, node: String },
    #[error(
        "line {line}: edge `{left}`-`{right}` conflicts with the value recorded on line {first_line}"
    )]
    ConflictingEdge {
        line: usize,
        first_line: usize,
        left: String,
        right: String,
    },
    #[error("line {line}: failed to read: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("edge list declares no nodes")]
    Empty,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdgeListError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "EDGELIST_MALFORMED_LINE",
            Self::InvalidDistance { .. } => "EDGELIST_INVALID_DISTANCE",
            Self::SelfLoop { .. } => "EDGELIST_SELF_LOOP",
            Self::ConflictingEdge { .. } => "EDGELIST_CONFLICTING_EDGE",
            Self::Read { .. } => "EDGELIST_READ",
            Self::Empty => "EDGELIST_EMPTY",
            Self::Io(_) => "EDGELIST_IO",
        }
    }

    /// Returns the 1-based line the error refers to, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line, .. }
            | Self::InvalidDistance { line, .. }
            | Self::SelfLoop { line, .. }
            | Self::ConflictingEdge { line, .. }
            | Self::Read { line, .. } => Some(*line),
            Self::Empty | Self::Io(_) => None,
        }
    }
}
