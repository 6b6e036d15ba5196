//! Brute-force reference for the clustering engine.
//!
//! Rescans every pair of live clusters on every iteration and recomputes
//! each linkage from the topology with [`linkage_cost`]. It shares the
//! engine's documented ordering rules but none of its data structures.

use crate::{PivotCounting, Termination, linkage_cost};

use super::types::HacFixture;

/// Outcome of the brute-force reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct OracleSelection {
    pub nodes: Vec<u32>,
    pub wanted: usize,
    pub termination: Termination,
    pub merges: usize,
}

/// Runs the reference algorithm for `fixture`.
pub(super) fn brute_force_select(fixture: &HacFixture) -> OracleSelection {
    let pivot = fixture.pivot.clone().unwrap_or_default();
    let pivot_len = pivot.len();
    let wanted = if pivot_len == 0 || fixture.counting == PivotCounting::ExcludesPivot {
        fixture.target
    } else {
        fixture.target.saturating_sub(pivot_len)
    };
    if wanted == 0 {
        return OracleSelection {
            nodes: Vec::new(),
            wanted: 0,
            termination: Termination::TargetReached,
            merges: 0,
        };
    }
    let goal = pivot_len + wanted;

    let mut slots: Vec<Option<Vec<u32>>> = Vec::new();
    if pivot_len > 0 {
        slots.push(Some(pivot.clone()));
    }
    slots.extend(
        fixture
            .candidates
            .iter()
            .filter(|node| !pivot.contains(*node))
            .map(|&node| Some(vec![node])),
    );

    let mut merges = 0;
    let mut termination = Termination::Exhausted;
    let already_large = slots.iter().flatten().any(|members| members.len() >= goal);
    if pivot_len == 0 && already_large {
        termination = Termination::TargetReached;
    } else {
        while let Some((left, right)) = cheapest_pair(fixture, &slots) {
            let absorbed = slots[right].take().expect("right slot is live");
            let kept = slots[left].take().expect("left slot is live");
            let merged = if pivot_len > 0 && left == 0 {
                [kept, absorbed].concat()
            } else if absorbed.len() > kept.len() {
                [absorbed, kept].concat()
            } else {
                [kept, absorbed].concat()
            };
            let size = merged.len();
            slots[left] = Some(merged);
            merges += 1;
            if (pivot_len == 0 || left == 0) && size >= goal {
                termination = Termination::TargetReached;
                break;
            }
        }
    }

    let members: Vec<u32> = if pivot_len > 0 {
        slots[0].clone().unwrap_or_default().split_off(pivot_len)
    } else {
        let mut best: Option<&Vec<u32>> = None;
        for members in slots.iter().flatten() {
            if best.is_none_or(|current| members.len() > current.len()) {
                best = Some(members);
            }
        }
        best.cloned().unwrap_or_default()
    };

    OracleSelection {
        nodes: members.into_iter().take(wanted).collect(),
        wanted,
        termination,
        merges,
    }
}

/// Finds the cheapest admissible pair, preferring the lowest slots.
fn cheapest_pair(fixture: &HacFixture, slots: &[Option<Vec<u32>>]) -> Option<(usize, usize)> {
    let mut best: Option<(u64, usize, usize)> = None;
    for (i, left) in slots.iter().enumerate() {
        let Some(left) = left else { continue };
        for (j, right) in slots.iter().enumerate().skip(i + 1) {
            let Some(right) = right else { continue };
            let cost = linkage_cost(
                fixture.linkage,
                &fixture.topology,
                left.as_slice(),
                right.as_slice(),
            );
            let Some(cost) = cost else { continue };
            if cost > fixture.threshold {
                continue;
            }
            if best.is_none_or(|current| (cost, i, j) < current) {
                best = Some((cost, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (i, j))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{Linkage, test_utils::topology_from_edges};

    use super::super::types::{DistanceProfile, PivotShape};

    fn fixture(pivot: Option<Vec<u32>>, target: usize) -> HacFixture {
        HacFixture {
            profile: DistanceProfile::Complete,
            shape: if pivot.is_some() {
                PivotShape::InsideCandidates
            } else {
                PivotShape::Unseeded
            },
            topology: topology_from_edges("oracle", &[(1, 2, 2), (1, 3, 4), (2, 3, 10)]),
            candidates: vec![1, 2, 3],
            pivot,
            target,
            threshold: u64::MAX,
            linkage: Linkage::Average,
            counting: PivotCounting::IncludesPivot,
        }
    }

    #[rstest]
    #[case(None, 3, vec![1, 2, 3], 2)]
    #[case(None, 2, vec![1, 2], 1)]
    #[case(Some(vec![1]), 3, vec![2, 3], 2)]
    #[case(Some(vec![1]), 1, vec![], 0)]
    fn reference_matches_hand_traces(
        #[case] pivot: Option<Vec<u32>>,
        #[case] target: usize,
        #[case] expected: Vec<u32>,
        #[case] merges: usize,
    ) {
        let outcome = brute_force_select(&fixture(pivot, target));
        assert_eq!(outcome.nodes, expected);
        assert_eq!(outcome.merges, merges);
        assert_eq!(outcome.termination, Termination::TargetReached);
    }
}
