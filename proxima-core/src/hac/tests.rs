//! Unit tests for the clustering engine.

use rstest::{fixture, rstest};

use crate::{
    HacBuilder, Linkage, PivotCounting, SelectionError, Termination, TopologyMap,
    test_utils::{CountingTopology, topology_from_edges},
};

/// 1-2 = 2, 1-3 = 4, 2-3 = 10.
#[fixture]
fn full_triangle() -> TopologyMap<u32> {
    topology_from_edges("full", &[(1, 2, 2), (1, 3, 4), (2, 3, 10)])
}

/// 1-2 = 2, 1-3 = 4, 2-3 unknown.
#[fixture]
fn broken_triangle() -> TopologyMap<u32> {
    topology_from_edges("broken", &[(1, 2, 2), (1, 3, 4)])
}

#[rstest]
fn unseeded_selection_stops_when_pair_cannot_grow(broken_triangle: TopologyMap<u32>) {
    let selection = HacBuilder::new()
        .build()
        .select(20, &[1, 2, 3], None, &broken_triangle)
        .expect("valid request");
    assert_eq!(selection.nodes(), [1, 2]);
    assert_eq!(selection.termination(), Termination::Exhausted);
    assert_eq!(selection.merges(), 1);
    assert_eq!(selection.shortfall(), 18);
}

#[rstest]
#[case(None, &[1, 2, 3], 2)]
#[case(Some(&[1_u32][..]), &[2, 3], 2)]
fn full_graph_merges_everything(
    full_triangle: TopologyMap<u32>,
    #[case] pivot: Option<&[u32]>,
    #[case] expected: &[u32],
    #[case] merges: usize,
) {
    let selection = HacBuilder::new()
        .build()
        .select(3, &[1, 2, 3], pivot, &full_triangle)
        .expect("valid request");
    assert_eq!(selection.nodes(), expected);
    assert_eq!(selection.termination(), Termination::TargetReached);
    assert_eq!(selection.merges(), merges);
    assert!(selection.is_satisfied());
}

#[rstest]
fn pivot_growth_blocked_by_unknown_cross_pair(broken_triangle: TopologyMap<u32>) {
    let selection = HacBuilder::new()
        .build()
        .select(3, &[1, 2, 3], Some(&[1][..]), &broken_triangle)
        .expect("valid request");
    assert_eq!(selection.nodes(), [2]);
    assert_eq!(selection.wanted(), 2);
    assert_eq!(selection.termination(), Termination::Exhausted);
}

#[rstest]
#[case(Linkage::Average, &[1, 2])]
#[case(Linkage::Minimum, &[1, 2, 3])]
#[case(Linkage::Maximum, &[1, 2])]
fn linkage_decides_whether_threshold_admits_merge(
    #[case] linkage: Linkage,
    #[case] expected: &[u32],
) {
    let topology = topology_from_edges("linkage", &[(1, 2, 1), (1, 3, 2), (2, 3, 10)]);
    let selection = HacBuilder::new()
        .with_linkage(linkage)
        .with_threshold(3)
        .build()
        .select(3, &[1, 2, 3], None, &topology)
        .expect("valid request");
    assert_eq!(selection.nodes(), expected);
}

#[rstest]
fn threshold_is_inclusive() {
    let topology = topology_from_edges("edge", &[(1, 2, 7)]);
    let at = HacBuilder::new().with_threshold(7).build();
    let below = HacBuilder::new().with_threshold(6).build();

    let reached = at.select(2, &[1, 2], None, &topology).expect("valid");
    assert_eq!(reached.nodes(), [1, 2]);

    let blocked = below.select(2, &[1, 2], None, &topology).expect("valid");
    assert_eq!(blocked.nodes(), [1]);
    assert_eq!(blocked.termination(), Termination::Exhausted);
}

#[rstest]
fn overshooting_merge_is_truncated_from_the_tail() {
    let topology = topology_from_edges(
        "pairs",
        &[
            (1, 2, 1),
            (3, 4, 1),
            (1, 3, 5),
            (1, 4, 5),
            (2, 3, 5),
            (2, 4, 5),
        ],
    );
    let selection = HacBuilder::new()
        .build()
        .select(3, &[1, 2, 3, 4], None, &topology)
        .expect("valid request");
    assert_eq!(selection.nodes(), [1, 2, 3]);
    assert_eq!(selection.merges(), 3);
}

#[rstest]
fn equal_costs_resolve_by_caller_order() {
    let mut topology = TopologyMap::new("flat");
    for left in 1..=4_u32 {
        for right in (left + 1)..=4 {
            topology.insert(left, right, 1);
        }
    }
    let hac = HacBuilder::new().build();

    let forward = hac.select(2, &[1, 2, 3, 4], None, &topology).expect("valid");
    let reversed = hac.select(2, &[4, 3, 2, 1], None, &topology).expect("valid");
    assert_eq!(forward.nodes(), [1, 2]);
    assert_eq!(reversed.nodes(), [4, 3]);
}

#[rstest]
fn largest_cluster_wins_over_earlier_smaller_one() {
    let topology = topology_from_edges("chain", &[(2, 3, 1), (3, 4, 1), (2, 4, 1), (1, 5, 9)]);
    let selection = HacBuilder::new()
        .build()
        .select(10, &[1, 2, 3, 4, 5], None, &topology)
        .expect("valid request");
    assert_eq!(selection.nodes(), [2, 3, 4]);
    assert_eq!(selection.termination(), Termination::Exhausted);
}

#[rstest]
#[case(PivotCounting::IncludesPivot, 3, &[2, 3])]
#[case(PivotCounting::IncludesPivot, 2, &[2])]
#[case(PivotCounting::ExcludesPivot, 2, &[2, 3])]
#[case(PivotCounting::ExcludesPivot, 1, &[2])]
fn pivot_counting_controls_the_goal(
    full_triangle: TopologyMap<u32>,
    #[case] counting: PivotCounting,
    #[case] target: usize,
    #[case] expected: &[u32],
) {
    let selection = HacBuilder::new()
        .with_pivot_counting(counting)
        .build()
        .select(target, &[1, 2, 3], Some(&[1][..]), &full_triangle)
        .expect("valid request");
    assert_eq!(selection.nodes(), expected);
    assert!(selection.is_satisfied());
}

#[rstest]
fn pivot_outside_candidates_is_grown() {
    let topology = topology_from_edges("remote", &[(9, 1, 1), (9, 2, 3), (1, 2, 2)]);
    let selection = HacBuilder::new()
        .build()
        .select(3, &[1, 2], Some(&[9][..]), &topology)
        .expect("valid request");
    assert_eq!(selection.nodes(), [1, 2]);
}

#[rstest]
#[case(0, None)]
#[case(1, Some(&[1_u32][..]))]
#[case(1, Some(&[1_u32, 2][..]))]
fn nothing_wanted_skips_the_oracle(
    full_triangle: TopologyMap<u32>,
    #[case] target: usize,
    #[case] pivot: Option<&[u32]>,
) {
    let topology = CountingTopology::new(full_triangle);
    let selection = HacBuilder::new()
        .build()
        .select(target, &[1, 2, 3], pivot, &topology)
        .expect("valid request");
    assert!(selection.is_empty());
    assert!(selection.is_satisfied());
    assert_eq!(selection.termination(), Termination::TargetReached);
    assert_eq!(topology.calls(), 0);
}

#[rstest]
fn target_of_one_returns_first_candidate(full_triangle: TopologyMap<u32>) {
    let selection = HacBuilder::new()
        .build()
        .select(1, &[3, 1, 2], None, &full_triangle)
        .expect("valid request");
    assert_eq!(selection.nodes(), [3]);
    assert_eq!(selection.merges(), 0);
}

#[rstest]
fn empty_candidates_yield_empty_selection(full_triangle: TopologyMap<u32>) {
    let selection = HacBuilder::new()
        .build()
        .select(3, &[] as &[u32], None, &full_triangle)
        .expect("valid request");
    assert!(selection.is_empty());
    assert_eq!(selection.termination(), Termination::Exhausted);
}

#[rstest]
#[case(None, 6 * 5 / 2)]
#[case(Some(&[0_u32, 1][..]), 2 * 4 + 4 * 3 / 2)]
fn each_pair_is_queried_at_most_once(#[case] pivot: Option<&[u32]>, #[case] expected: usize) {
    let mut map = TopologyMap::new("complete");
    for left in 0..6_u32 {
        for right in (left + 1)..6 {
            map.insert(left, right, u64::from(left + right));
        }
    }
    let topology = CountingTopology::new(map);
    HacBuilder::new()
        .build()
        .select(6, &[0, 1, 2, 3, 4, 5], pivot, &topology)
        .expect("valid request");
    assert_eq!(topology.calls(), expected);
}

#[rstest]
#[case(&[1, 2, 1], None, SelectionError::DuplicateCandidate { position: 2 })]
#[case(&[1, 2, 3], Some(&[1_u32, 1][..]), SelectionError::DuplicatePivotMember { position: 1 })]
#[case(&[1, 2, 3], Some(&[][..]), SelectionError::EmptyPivot)]
#[case(&[1, 1], Some(&[1_u32][..]), SelectionError::DuplicateCandidate { position: 1 })]
fn rejects_invalid_inputs(
    full_triangle: TopologyMap<u32>,
    #[case] candidates: &[u32],
    #[case] pivot: Option<&[u32]>,
    #[case] expected: SelectionError,
) {
    let err = HacBuilder::new()
        .build()
        .select(2, candidates, pivot, &full_triangle)
        .expect_err("input must be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn zero_distance_is_a_valid_minimal_edge() {
    let topology = topology_from_edges("zero", &[(1, 2, 3), (2, 3, 0)]);
    let selection = HacBuilder::new()
        .with_threshold(0)
        .build()
        .select(3, &[1, 2, 3], None, &topology)
        .expect("valid request");
    assert_eq!(selection.nodes(), [2, 3]);
}

#[rstest]
fn engine_reports_configuration() {
    let hac = HacBuilder::new()
        .with_linkage(Linkage::Minimum)
        .with_threshold(42)
        .build();
    assert_eq!(hac.linkage(), Linkage::Minimum);
    assert_eq!(hac.threshold(), 42);
    assert_eq!(hac.pivot_counting(), PivotCounting::IncludesPivot);
}
