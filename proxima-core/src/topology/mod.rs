//! Topology oracle abstractions.
//!
//! A [`Topology`] answers pairwise distance queries between nodes. Distances
//! are non-negative integers; `None` means the pair has no known edge, which
//! the clustering engine treats as unreachable.

mod map;

pub use self::map::TopologyMap;

/// Read-only source of pairwise node distances.
///
/// Implementations must be symmetric: `distance(a, b) == distance(b, a)`.
/// The engine queries the oracle lazily and never mutates it, so one
/// topology snapshot can serve many concurrent selections.
///
/// # Examples
/// ```
/// use proxima_core::Topology;
///
/// struct Line;
///
/// impl Topology<u32> for Line {
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, left: &u32, right: &u32) -> Option<u64> {
///         Some(u64::from(left.abs_diff(*right)))
///     }
/// }
///
/// let line = Line;
/// assert_eq!(line.distance(&1, &4), Some(3));
/// assert_eq!(line.distances_from(&0, &[2, 5]), [Some(2), Some(5)]);
/// ```
pub trait Topology<N: ?Sized> {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str {
        "topology"
    }

    /// Returns the distance between two nodes, or `None` when no edge is
    /// known.
    fn distance(&self, left: &N, right: &N) -> Option<u64>;

    /// Returns the distances from `query` to every entry in `candidates`.
    ///
    /// The default implementation calls [`Topology::distance`] for each
    /// candidate in order.
    fn distances_from(&self, query: &N, candidates: &[N]) -> Vec<Option<u64>>
    where
        N: Sized,
    {
        candidates
            .iter()
            .map(|candidate| self.distance(query, candidate))
            .collect()
    }
}

impl<N: ?Sized, T: Topology<N> + ?Sized> Topology<N> for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn distance(&self, left: &N, right: &N) -> Option<u64> {
        (**self).distance(left, right)
    }
}
