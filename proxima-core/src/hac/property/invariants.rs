//! Property 2: selection invariants.
//!
//! Checks membership, size, connectivity and oracle usage guarantees that
//! hold for every request regardless of the generated topology.

use std::collections::HashSet;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{HacBuilder, Linkage, Selection, Termination, Topology, test_utils::CountingTopology};

use super::types::HacFixture;

/// Runs the structural invariant property for `fixture`.
pub(super) fn run_selection_invariants_property(fixture: &HacFixture) -> TestCaseResult {
    let topology = CountingTopology::new(&fixture.topology);
    let selection = HacBuilder::new()
        .with_linkage(fixture.linkage)
        .with_threshold(fixture.threshold)
        .with_pivot_counting(fixture.counting)
        .build()
        .select(fixture.target, fixture.candidates.as_slice(), fixture.pivot(), &topology)
        .map_err(|e| TestCaseError::fail(format!("select failed: {e} ({})", fixture.describe())))?;

    check_membership(fixture, &selection)?;
    check_size(fixture, &selection)?;
    check_connectivity(fixture, &selection)?;
    check_oracle_usage(fixture, topology.calls())
}

fn fail(fixture: &HacFixture, message: String) -> TestCaseResult {
    Err(TestCaseError::fail(format!("{message} ({})", fixture.describe())))
}

fn check_membership(fixture: &HacFixture, selection: &Selection<u32>) -> TestCaseResult {
    let candidates: HashSet<_> = fixture.candidates.iter().collect();
    let pivot: HashSet<_> = fixture.pivot.iter().flatten().collect();
    let mut seen = HashSet::new();
    for node in selection.nodes() {
        if !candidates.contains(node) {
            return fail(fixture, format!("node {node} is not a candidate"));
        }
        if pivot.contains(node) {
            return fail(fixture, format!("node {node} is a pivot member"));
        }
        if !seen.insert(node) {
            return fail(fixture, format!("node {node} selected twice"));
        }
    }
    Ok(())
}

fn check_size(fixture: &HacFixture, selection: &Selection<u32>) -> TestCaseResult {
    if selection.len() > selection.wanted() || selection.len() > fixture.target {
        return fail(
            fixture,
            format!(
                "selected {} nodes for wanted={} target={}",
                selection.len(),
                selection.wanted(),
                fixture.target
            ),
        );
    }
    let reached = selection.termination() == Termination::TargetReached;
    if reached != selection.is_satisfied() {
        return fail(
            fixture,
            format!(
                "termination {} disagrees with satisfied={}",
                selection.termination(),
                selection.is_satisfied()
            ),
        );
    }
    let interned = fixture.candidates.len() + fixture.pivot.as_ref().map_or(0, Vec::len);
    if selection.merges() >= interned.max(1) {
        return fail(fixture, format!("{} merges for {interned} nodes", selection.merges()));
    }
    Ok(())
}

/// Every selected node must be linked to every other selected node and to
/// every pivot member, and within the threshold under maximum linkage.
fn check_connectivity(fixture: &HacFixture, selection: &Selection<u32>) -> TestCaseResult {
    let pivot = fixture.pivot.clone().unwrap_or_default();
    let nodes = selection.nodes();
    for (index, node) in nodes.iter().enumerate() {
        let peers = nodes.iter().skip(index + 1).chain(pivot.iter());
        for peer in peers {
            let Some(distance) = fixture.topology.distance(node, peer) else {
                return fail(fixture, format!("selected {node} has no edge to {peer}"));
            };
            if fixture.linkage == Linkage::Maximum && distance > fixture.threshold {
                return fail(
                    fixture,
                    format!("edge {node}-{peer} = {distance} exceeds the threshold"),
                );
            }
        }
    }
    Ok(())
}

fn check_oracle_usage(fixture: &HacFixture, calls: usize) -> TestCaseResult {
    let pivot_len = fixture.pivot.as_ref().map_or(0, Vec::len);
    let pivot: HashSet<_> = fixture.pivot.iter().flatten().collect();
    let others = fixture
        .candidates
        .iter()
        .filter(|node| !pivot.contains(node))
        .count();
    let budget = others * others.saturating_sub(1) / 2 + pivot_len * others;
    if calls > budget {
        return fail(fixture, format!("{calls} oracle calls exceed {budget} pairs"));
    }
    Ok(())
}
