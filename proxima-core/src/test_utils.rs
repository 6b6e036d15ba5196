//! Shared test utilities for `proxima-core`.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use proptest::test_runner::Config as ProptestConfig;
use proxima_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::{Topology, TopologyMap};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `PROXIMA_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// [`Topology`] wrapper that records every distance query.
#[derive(Clone, Debug)]
pub(crate) struct CountingTopology<T> {
    inner: T,
    calls: Arc<AtomicUsize>,
}

impl<T> CountingTopology<T> {
    #[must_use]
    pub(crate) fn new(inner: T) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many distance queries have been answered.
    #[must_use]
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<N, T: Topology<N>> Topology<N> for CountingTopology<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn distance(&self, left: &N, right: &N) -> Option<u64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.distance(left, right)
    }
}

/// Builds a topology over `u32` nodes from `(left, right, distance)` edges.
#[must_use]
pub(crate) fn topology_from_edges(name: &str, edges: &[(u32, u32, u64)]) -> TopologyMap<u32> {
    let mut topology = TopologyMap::new(name);
    for &(left, right, distance) in edges {
        topology.insert(left, right, distance);
    }
    topology
}
