//! Benchmark parameter types.

use std::fmt;

/// Parameters for one clustering benchmark run.
#[derive(Clone, Debug)]
pub struct SelectionBenchParams {
    /// Number of candidate nodes in the grid.
    pub candidates: usize,
    /// Requested selection size.
    pub target: usize,
    /// Whether the selection is grown around a pivot.
    pub seeded: bool,
}

impl fmt::Display for SelectionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.seeded { "pivot" } else { "free" };
        write!(f, "n={},k={},{mode}", self.candidates, self.target)
    }
}
