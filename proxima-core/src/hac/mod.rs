//! Greedy hierarchical agglomerative clustering over a topology oracle.
//!
//! The engine interns the request's nodes, builds a [`pool::ClusterPool`]
//! holding link statistics for every pair of clusters, and repeatedly pops
//! the cheapest valid merge from a [`queue::MergeQueue`] until the cluster
//! of interest is large enough or no merge within the threshold remains.

mod cluster;
mod pool;
mod queue;

#[cfg(test)]
mod property;
#[cfg(test)]
mod tests;

use std::{collections::HashSet, hash::Hash};

use tracing::{info, instrument, trace};

use crate::{
    builder::PivotCounting,
    error::{Result, SelectionError},
    linkage::Linkage,
    result::{Selection, Termination},
    topology::Topology,
};

use self::{pool::ClusterPool, queue::MergeQueue};

/// Hierarchical agglomerative clustering engine.
///
/// Holds only configuration; every [`Hac::select`] call builds and discards
/// its own cluster pool, so one engine can serve concurrent callers.
///
/// # Examples
/// ```
/// use proxima_core::{HacBuilder, Termination, TopologyMap};
///
/// let mut topology = TopologyMap::new("rack");
/// topology.insert(1, 2, 2);
/// topology.insert(1, 3, 4);
/// topology.insert(2, 3, 10);
///
/// let hac = HacBuilder::new().build();
/// let selection = hac.select(3, &[1, 2, 3], None, &topology)?;
/// assert_eq!(selection.nodes(), [1, 2, 3]);
/// assert_eq!(selection.termination(), Termination::TargetReached);
///
/// let seeded = hac.select(3, &[1, 2, 3], Some([1].as_slice()), &topology)?;
/// assert_eq!(seeded.nodes(), [2, 3]);
/// # Ok::<(), proxima_core::SelectionError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hac {
    linkage: Linkage,
    threshold: u64,
    pivot_counting: PivotCounting,
}

impl Hac {
    pub(crate) fn new(linkage: Linkage, threshold: u64, pivot_counting: PivotCounting) -> Self {
        Self {
            linkage,
            threshold,
            pivot_counting,
        }
    }

    /// Returns the linkage used to cost merges.
    #[must_use]
    #[rustfmt::skip]
    pub fn linkage(&self) -> Linkage { self.linkage }

    /// Returns the inclusive upper bound on a single merge's cost.
    #[must_use]
    #[rustfmt::skip]
    pub fn threshold(&self) -> u64 { self.threshold }

    /// Returns how pivot members count towards the target size.
    #[must_use]
    #[rustfmt::skip]
    pub fn pivot_counting(&self) -> PivotCounting { self.pivot_counting }

    /// Selects up to `target_size` candidates that sit close together.
    ///
    /// Without a pivot the largest cluster is returned once it holds
    /// `target_size` members or no valid merge remains. With a pivot the
    /// pivot's cluster is grown instead, and only the nodes it acquired are
    /// returned. Candidates that are also pivot members are never selected
    /// independently.
    ///
    /// A selection smaller than requested is not an error.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyPivot`] when `pivot` is `Some` but
    /// empty, [`SelectionError::DuplicatePivotMember`] when a pivot node is
    /// repeated, and [`SelectionError::DuplicateCandidate`] when a candidate
    /// is repeated.
    #[instrument(
        name = "hac.select",
        err,
        skip(self, candidates, pivot, topology),
        fields(
            topology = %topology.name(),
            candidates = candidates.len(),
            pivot = pivot.map_or(0, <[N]>::len),
            target = target_size,
            linkage = %self.linkage,
            threshold = self.threshold,
        ),
    )]
    pub fn select<N, T>(
        &self,
        target_size: usize,
        candidates: &[N],
        pivot: Option<&[N]>,
        topology: &T,
    ) -> Result<Selection<N>>
    where
        N: Clone + Eq + Hash,
        T: Topology<N> + ?Sized,
    {
        let nodes = InternedNodes::new(candidates, pivot)?;
        let pivot_len = nodes.pivot_len;
        let wanted = match (pivot_len, self.pivot_counting) {
            (0, _) | (_, PivotCounting::ExcludesPivot) => target_size,
            (_, PivotCounting::IncludesPivot) => target_size.saturating_sub(pivot_len),
        };
        if wanted == 0 {
            let selection = Selection::new(Vec::new(), 0, Termination::TargetReached, 0);
            record_selection(&selection);
            info!(selected = 0, wanted = 0, merges = 0, "hac selection needs no nodes");
            return Ok(selection);
        }
        let goal = pivot_len.saturating_add(wanted);

        let mut pool = ClusterPool::build(nodes.len(), pivot_len, |a, b| {
            let (left, right) = (nodes.get(a)?, nodes.get(b)?);
            topology.distance(left, right)
        });
        let mut queue = MergeQueue::new(self.threshold);
        let initial: Vec<_> = pool.known_links().collect();
        for (left, right, stats) in initial {
            if let Some(cost) = self.linkage.cost(&stats) {
                queue.push(cost, left, right, pool.versions());
            }
        }

        let (termination, merges) = self.run(&mut pool, &mut queue, pivot_len > 0, goal);

        let members = if pivot_len > 0 {
            pool.cluster(0).map(|cluster| cluster.members().get(pivot_len..).unwrap_or_default())
        } else {
            pool.largest().map(|(_, cluster)| cluster.members())
        };
        let selected: Vec<N> = members
            .unwrap_or_default()
            .iter()
            .take(wanted)
            .filter_map(|&index| nodes.get(index).cloned())
            .collect();

        let selection = Selection::new(selected, wanted, termination, merges);
        record_selection(&selection);
        info!(
            selected = selection.len(),
            wanted,
            merges,
            termination = %termination,
            "hac selection completed"
        );
        Ok(selection)
    }

    /// Runs the merge loop until the cluster of interest holds `goal`
    /// members or the queue runs dry.
    fn run(
        &self,
        pool: &mut ClusterPool,
        queue: &mut MergeQueue,
        seeded: bool,
        goal: usize,
    ) -> (Termination, usize) {
        if !seeded && pool.largest().is_some_and(|(_, cluster)| cluster.len() >= goal) {
            return (Termination::TargetReached, 0);
        }

        let mut merges = 0_usize;
        while let Some(candidate) = queue.pop_valid(pool.versions()) {
            let Some(size) = pool.merge(candidate.left, candidate.right) else {
                continue;
            };
            merges += 1;
            trace!(
                cost = candidate.cost,
                left = candidate.left,
                right = candidate.right,
                size,
                clusters = pool.live(),
                "merged clusters"
            );
            record_merge();

            let grew_target = !seeded || candidate.left == 0;
            if grew_target && size >= goal {
                return (Termination::TargetReached, merges);
            }

            let fresh: Vec<_> = pool.known_links_of(candidate.left).collect();
            for (other, stats) in fresh {
                if let Some(cost) = self.linkage.cost(&stats) {
                    queue.push(cost, candidate.left, other, pool.versions());
                }
            }
        }
        (Termination::Exhausted, merges)
    }
}

/// Request nodes interned to dense indices.
///
/// Pivot members come first, followed by the candidates that are not pivot
/// members, in caller order.
struct InternedNodes<'a, N> {
    nodes: Vec<&'a N>,
    pivot_len: usize,
}

impl<'a, N> InternedNodes<'a, N>
where
    N: Eq + Hash,
{
    fn new(candidates: &'a [N], pivot: Option<&'a [N]>) -> Result<Self> {
        let mut nodes = Vec::with_capacity(candidates.len() + pivot.map_or(0, <[N]>::len));
        let mut pivot_members = HashSet::new();
        if let Some(pivot) = pivot {
            if pivot.is_empty() {
                return Err(SelectionError::EmptyPivot);
            }
            for (position, node) in pivot.iter().enumerate() {
                if !pivot_members.insert(node) {
                    return Err(SelectionError::DuplicatePivotMember { position });
                }
                nodes.push(node);
            }
        }
        let pivot_len = nodes.len();

        let mut seen = HashSet::with_capacity(candidates.len());
        for (position, node) in candidates.iter().enumerate() {
            if !seen.insert(node) {
                return Err(SelectionError::DuplicateCandidate { position });
            }
            if !pivot_members.contains(node) {
                nodes.push(node);
            }
        }
        Ok(Self { nodes, pivot_len })
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, index: usize) -> Option<&'a N> {
        self.nodes.get(index).copied()
    }
}

#[cfg(feature = "metrics")]
fn record_selection<N>(selection: &Selection<N>) {
    metrics::counter!("hac_selections_total").increment(1);
    if !selection.is_satisfied() {
        metrics::counter!("hac_unsatisfied_selections_total").increment(1);
    }
}

#[cfg(not(feature = "metrics"))]
fn record_selection<N>(_selection: &Selection<N>) {}

#[cfg(feature = "metrics")]
fn record_merge() {
    metrics::counter!("hac_merges_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_merge() {}
