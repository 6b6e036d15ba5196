//! Priority queue of pending merges with lazy invalidation.

use std::{cmp::Reverse, collections::BinaryHeap};

/// A potential merge of the clusters in slots `left < right`.
///
/// Field order defines the merge priority: cheapest cost first, then the
/// lowest left slot, then the lowest right slot.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct MergeCandidate {
    pub(crate) cost: u64,
    pub(crate) left: usize,
    pub(crate) right: usize,
    left_version: u32,
    right_version: u32,
}

/// Min-heap of merge candidates.
///
/// Entries are never removed eagerly. Each slot carries a version stamp
/// that changes whenever its cluster changes, and [`MergeQueue::pop_valid`]
/// discards entries whose stamps no longer match.
#[derive(Debug)]
pub(crate) struct MergeQueue {
    heap: BinaryHeap<Reverse<MergeCandidate>>,
    threshold: u64,
}

impl MergeQueue {
    pub(crate) fn new(threshold: u64) -> Self {
        Self {
            heap: BinaryHeap::new(),
            threshold,
        }
    }

    /// Enqueues a merge unless its cost exceeds the threshold.
    ///
    /// `versions` must be indexed by slot.
    pub(crate) fn push(&mut self, cost: u64, a: usize, b: usize, versions: &[u32]) -> bool {
        if cost > self.threshold {
            return false;
        }
        let (left, right) = if a < b { (a, b) } else { (b, a) };
        let (Some(&left_version), Some(&right_version)) = (versions.get(left), versions.get(right))
        else {
            return false;
        };
        self.heap.push(Reverse(MergeCandidate {
            cost,
            left,
            right,
            left_version,
            right_version,
        }));
        true
    }

    /// Pops the cheapest candidate whose clusters are unchanged since it
    /// was enqueued.
    pub(crate) fn pop_valid(&mut self, versions: &[u32]) -> Option<MergeCandidate> {
        while let Some(Reverse(candidate)) = self.heap.pop() {
            let current = (versions.get(candidate.left), versions.get(candidate.right));
            if current == (Some(&candidate.left_version), Some(&candidate.right_version)) {
                return Some(candidate);
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
