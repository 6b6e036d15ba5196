//! Selection result types.

use std::fmt;

/// Reason the merge loop stopped.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Termination {
    /// The cluster of interest reached the requested size.
    TargetReached,
    /// No valid merge within the threshold remained.
    Exhausted,
}

impl Termination {
    /// Returns the stable machine-readable name of this termination reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TargetReached => "target_reached",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nodes chosen by a selection request.
///
/// A selection shorter than [`Selection::wanted`] is a valid best-effort
/// answer rather than an error. Callers that need an exact count should
/// check [`Selection::is_satisfied`].
///
/// # Examples
/// ```
/// use proxima_core::{HacBuilder, TopologyMap};
///
/// let mut topology = TopologyMap::new("pair");
/// topology.insert("a", "b", 1);
///
/// let selection = HacBuilder::new()
///     .build()
///     .select(3, &["a", "b", "c"], None, &topology)
///     .expect("inputs are valid");
/// assert_eq!(selection.nodes(), ["a", "b"]);
/// assert_eq!(selection.wanted(), 3);
/// assert_eq!(selection.shortfall(), 1);
/// assert!(!selection.is_satisfied());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection<N> {
    nodes: Vec<N>,
    wanted: usize,
    termination: Termination,
    merges: usize,
    extra: Vec<N>,
}

impl<N> Selection<N> {
    pub(crate) fn new(nodes: Vec<N>, wanted: usize, termination: Termination, merges: usize) -> Self {
        Self {
            nodes,
            wanted,
            termination,
            merges,
            extra: Vec::new(),
        }
    }

    pub(crate) fn with_extra(mut self, extra: Vec<N>) -> Self {
        self.extra = extra;
        self
    }

    /// Returns the selected nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[N] { &self.nodes }

    /// Consumes the selection and returns the selected nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_nodes(self) -> Vec<N> { self.nodes }

    /// Returns the number of selected nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns whether no node was selected.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the largest number of nodes this request could return.
    #[must_use]
    #[rustfmt::skip]
    pub fn wanted(&self) -> usize { self.wanted }

    /// Returns whether the selection holds every wanted node.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.nodes.len() >= self.wanted
    }

    /// Returns how many wanted nodes are missing.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.wanted.saturating_sub(self.nodes.len())
    }

    /// Returns why the merge loop stopped.
    #[must_use]
    #[rustfmt::skip]
    pub fn termination(&self) -> Termination { self.termination }

    /// Returns the number of merges performed.
    #[must_use]
    #[rustfmt::skip]
    pub fn merges(&self) -> usize { self.merges }

    /// Returns nodes handed over alongside the selection because they share
    /// an exclusively reserved host with it.
    #[must_use]
    #[rustfmt::skip]
    pub fn extra_nodes(&self) -> &[N] { &self.extra }
}
