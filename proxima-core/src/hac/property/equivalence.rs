//! Property 1: agreement with the brute-force reference.
//!
//! The incremental engine must pick the same merges as a reference that
//! recomputes every linkage on every iteration, so both report identical
//! selections, termination reasons and merge counts.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::HacBuilder;

use super::oracle::brute_force_select;
use super::types::HacFixture;

/// Runs the reference equivalence property for `fixture`.
pub(super) fn run_oracle_equivalence_property(fixture: &HacFixture) -> TestCaseResult {
    let selection = HacBuilder::new()
        .with_linkage(fixture.linkage)
        .with_threshold(fixture.threshold)
        .with_pivot_counting(fixture.counting)
        .build()
        .select(
            fixture.target,
            fixture.candidates.as_slice(),
            fixture.pivot(),
            &fixture.topology,
        )
        .map_err(|e| TestCaseError::fail(format!("select failed: {e} ({})", fixture.describe())))?;

    let oracle = brute_force_select(fixture);

    if selection.nodes() != oracle.nodes.as_slice() {
        return Err(TestCaseError::fail(format!(
            "selection mismatch: engine={:?}, reference={:?} ({})",
            selection.nodes(),
            oracle.nodes,
            fixture.describe(),
        )));
    }
    if selection.termination() != oracle.termination {
        return Err(TestCaseError::fail(format!(
            "termination mismatch: engine={}, reference={} ({})",
            selection.termination(),
            oracle.termination,
            fixture.describe(),
        )));
    }
    if selection.merges() != oracle.merges {
        return Err(TestCaseError::fail(format!(
            "merge count mismatch: engine={}, reference={} ({})",
            selection.merges(),
            oracle.merges,
            fixture.describe(),
        )));
    }
    if selection.wanted() != oracle.wanted {
        return Err(TestCaseError::fail(format!(
            "wanted mismatch: engine={}, reference={} ({})",
            selection.wanted(),
            oracle.wanted,
            fixture.describe(),
        )));
    }
    Ok(())
}
