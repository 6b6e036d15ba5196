//! Fixture types for clustering property tests.

use test_strategy::Arbitrary;

use crate::{Linkage, PivotCounting, TopologyMap};

/// Shape of the generated distance graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum DistanceProfile {
    /// Moderately dense graph with widely spread distances.
    #[weight(3)]
    Uniform,
    /// Dense graph whose distances collide constantly, stressing tie-breaks.
    #[weight(3)]
    ManyTies,
    /// Few known edges, so most merges are blocked.
    #[weight(2)]
    Sparse,
    /// Every pair is known.
    #[weight(1)]
    Complete,
    /// Disjoint groups with no edges between them.
    #[weight(2)]
    Fragmented,
}

/// How the pivot relates to the candidate list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum PivotShape {
    /// No pivot is supplied.
    #[weight(2)]
    Unseeded,
    /// The pivot is drawn from the candidates.
    #[weight(2)]
    InsideCandidates,
    /// The pivot consists of extra nodes that are not candidates.
    #[weight(1)]
    OutsideCandidates,
}

/// One generated selection request.
#[derive(Clone, Debug)]
pub(super) struct HacFixture {
    /// Profile used to generate the distances.
    pub profile: DistanceProfile,
    /// Pivot shape used to generate the request.
    pub shape: PivotShape,
    /// Distance oracle for the request.
    pub topology: TopologyMap<u32>,
    /// Candidate nodes in caller order.
    pub candidates: Vec<u32>,
    /// Optional pivot members.
    pub pivot: Option<Vec<u32>>,
    /// Requested target size.
    pub target: usize,
    /// Inclusive merge threshold.
    pub threshold: u64,
    /// Linkage used to cost merges.
    pub linkage: Linkage,
    /// Pivot counting mode.
    pub counting: PivotCounting,
}

impl HacFixture {
    /// Returns the pivot as a slice, if any.
    pub(super) fn pivot(&self) -> Option<&[u32]> {
        self.pivot.as_deref()
    }

    /// Summarises the fixture for failure messages.
    pub(super) fn describe(&self) -> String {
        format!(
            "profile={:?}, shape={:?}, candidates={}, pivot={:?}, target={}, \
             threshold={}, linkage={}, counting={:?}",
            self.profile,
            self.shape,
            self.candidates.len(),
            self.pivot,
            self.target,
            self.threshold,
            self.linkage,
            self.counting,
        )
    }
}
