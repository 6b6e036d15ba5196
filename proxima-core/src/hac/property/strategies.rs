//! Strategy builders for clustering property tests.
//!
//! Fixtures are produced from a profile, a pivot shape and a seed so that
//! failing cases can be replayed as targeted rstest cases.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{Linkage, PivotCounting, TopologyMap};

use super::types::{DistanceProfile, HacFixture, PivotShape};

/// Minimum candidate count.
const MIN_NODES: usize = 2;
/// Maximum candidate count; the brute-force reference is cubic.
const MAX_NODES: usize = 24;
/// Offset applied to node identifiers so they never equal pool slots.
const NODE_BASE: u32 = 100;
/// Offset applied to pivot nodes that are not candidates.
const OUTSIDE_BASE: u32 = 1_000;

/// Generates fixtures covering every profile and pivot shape.
pub(super) fn hac_fixture_strategy() -> impl Strategy<Value = HacFixture> {
    (any::<DistanceProfile>(), any::<PivotShape>(), any::<u64>()).prop_map(
        |(profile, shape, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            generate_fixture(profile, shape, &mut rng)
        },
    )
}

/// Generates a fixture for a specific profile and pivot shape.
pub(super) fn generate_fixture(
    profile: DistanceProfile,
    shape: PivotShape,
    rng: &mut SmallRng,
) -> HacFixture {
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let nodes: Vec<u32> = (NODE_BASE..).take(node_count).collect();

    let mut topology = TopologyMap::new(format!("{profile:?}").to_lowercase());
    let max_weight = populate_edges(&mut topology, &nodes, profile, rng);

    let mut candidates = nodes.clone();
    candidates.shuffle(rng);
    let pivot = generate_pivot(shape, &mut topology, &candidates, max_weight, rng);

    let target = rng.gen_range(0..=node_count + 2);
    let threshold = if rng.gen_bool(0.5) {
        u64::MAX
    } else {
        rng.gen_range(0..=max_weight)
    };
    let linkage = match rng.gen_range(0..4) {
        0 => Linkage::Minimum,
        1 => Linkage::Maximum,
        _ => Linkage::Average,
    };
    let counting = if rng.gen_bool(0.75) {
        PivotCounting::IncludesPivot
    } else {
        PivotCounting::ExcludesPivot
    };

    HacFixture {
        profile,
        shape,
        topology,
        candidates,
        pivot,
        target,
        threshold,
        linkage,
        counting,
    }
}

/// Adds edges for `profile` and returns the largest weight used.
fn populate_edges(
    topology: &mut TopologyMap<u32>,
    nodes: &[u32],
    profile: DistanceProfile,
    rng: &mut SmallRng,
) -> u64 {
    let (probability, max_weight) = match profile {
        DistanceProfile::Uniform => (rng.gen_range(0.5..=0.9), 100),
        DistanceProfile::ManyTies => (rng.gen_range(0.6..=1.0), 3),
        DistanceProfile::Sparse => (rng.gen_range(0.1..=0.3), 50),
        DistanceProfile::Complete => (1.0, 1_000),
        DistanceProfile::Fragmented => (0.8, 20),
    };
    let groups = rng.gen_range(2..=4_usize);
    let group_of: Vec<usize> = nodes.iter().map(|_| rng.gen_range(0..groups)).collect();

    for (i, &left) in nodes.iter().enumerate() {
        topology.add_host(left);
        for (j, &right) in nodes.iter().enumerate().skip(i + 1) {
            let same_group = group_of.get(i) == group_of.get(j);
            if profile == DistanceProfile::Fragmented && !same_group {
                continue;
            }
            if rng.gen_bool(probability) {
                topology.insert(left, right, rng.gen_range(0..=max_weight));
            }
        }
    }
    max_weight
}

fn generate_pivot(
    shape: PivotShape,
    topology: &mut TopologyMap<u32>,
    candidates: &[u32],
    max_weight: u64,
    rng: &mut SmallRng,
) -> Option<Vec<u32>> {
    match shape {
        PivotShape::Unseeded => None,
        PivotShape::InsideCandidates => {
            let size = rng.gen_range(1..=candidates.len().min(3));
            Some(candidates.choose_multiple(rng, size).copied().collect())
        }
        PivotShape::OutsideCandidates => {
            let size = rng.gen_range(1..=2_u32);
            let pivot: Vec<u32> = (0..size).map(|offset| OUTSIDE_BASE + offset).collect();
            for &member in &pivot {
                for &candidate in candidates {
                    if rng.gen_bool(0.7) {
                        topology.insert(member, candidate, rng.gen_range(0..=max_weight));
                    }
                }
            }
            Some(pivot)
        }
    }
}
