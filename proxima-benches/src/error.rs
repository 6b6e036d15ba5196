//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of using
//! `.expect()`.

use crate::grid::GridError;
use proxima_core::SelectionError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Grid generation failed.
    #[error("grid generation failed: {0}")]
    Grid(#[from] GridError),
    /// The selection request was rejected.
    #[error("selection failed: {0}")]
    Selection(#[from] SelectionError),
}
