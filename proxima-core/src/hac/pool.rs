//! Slot-indexed cluster pool with incrementally maintained link statistics.

use crate::linkage::LinkStats;

use super::cluster::Cluster;

/// The working partition of all interned nodes into clusters.
///
/// Slot `0` holds the pivot cluster when one is present. Every other slot
/// starts as a singleton in interned order. Merging keeps the survivor in
/// the lower slot and empties the higher one, so slot numbers never move.
///
/// Link statistics between every pair of live slots are stored in a
/// condensed upper-triangular table. Merging combines the survivor's and
/// the absorbed cluster's rows, so the distance oracle is consulted only
/// while the pool is being built.
#[derive(Debug)]
pub(crate) struct ClusterPool {
    slots: Vec<Option<Cluster>>,
    versions: Vec<u32>,
    links: Vec<Option<LinkStats>>,
    row_start: Vec<usize>,
    live: usize,
    has_pivot: bool,
}

impl ClusterPool {
    /// Builds the initial pool over `node_count` interned nodes.
    ///
    /// The first `pivot_len` nodes form the pivot cluster. `distance` is
    /// called at most once per unordered pair of nodes in different
    /// clusters.
    pub(crate) fn build<F>(node_count: usize, pivot_len: usize, mut distance: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<u64>,
    {
        let has_pivot = pivot_len > 0;
        let mut slots = Vec::with_capacity(node_count.saturating_sub(pivot_len).saturating_add(1));
        if has_pivot {
            slots.push(Some(Cluster::from_members((0..pivot_len).collect())));
        }
        slots.extend((pivot_len..node_count).map(|node| Some(Cluster::singleton(node))));

        let width = slots.len();
        let mut row_start = Vec::with_capacity(width);
        let mut offset = 0_usize;
        for row in 0..width {
            row_start.push(offset);
            offset = offset.saturating_add(width - row - 1);
        }

        let mut links = Vec::with_capacity(offset);
        for (row, left) in slots.iter().enumerate() {
            for right in slots.iter().skip(row + 1) {
                let link = match (left, right) {
                    (Some(left), Some(right)) => {
                        initial_link(left.members(), right.members(), &mut distance)
                    }
                    _ => None,
                };
                links.push(link);
            }
        }

        Self {
            versions: vec![0; width],
            live: width,
            slots,
            links,
            row_start,
            has_pivot,
        }
    }

    /// Returns the per-slot version stamps.
    #[rustfmt::skip]
    pub(crate) fn versions(&self) -> &[u32] { &self.versions }

    /// Returns the number of live clusters.
    #[rustfmt::skip]
    pub(crate) fn live(&self) -> usize { self.live }

    pub(crate) fn cluster(&self, slot: usize) -> Option<&Cluster> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Returns the largest live cluster, preferring the lowest slot.
    pub(crate) fn largest(&self) -> Option<(usize, &Cluster)> {
        let mut best: Option<(usize, &Cluster)> = None;
        for (slot, cluster) in self.live_clusters() {
            if best.is_none_or(|(_, current)| cluster.len() > current.len()) {
                best = Some((slot, cluster));
            }
        }
        best
    }

    pub(crate) fn live_clusters(&self) -> impl Iterator<Item = (usize, &Cluster)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, cluster)| cluster.as_ref().map(|c| (slot, c)))
    }

    /// Iterates over every pair of live slots with fully known links.
    pub(crate) fn known_links(&self) -> impl Iterator<Item = (usize, usize, LinkStats)> + '_ {
        self.live_clusters().flat_map(move |(left, _)| {
            self.live_clusters()
                .filter(move |(right, _)| *right > left)
                .filter_map(move |(right, _)| self.link(left, right).map(|s| (left, right, s)))
        })
    }

    /// Iterates over the fully known links between `slot` and every other
    /// live slot.
    pub(crate) fn known_links_of(&self, slot: usize) -> impl Iterator<Item = (usize, LinkStats)> + '_ {
        self.live_clusters()
            .filter(move |(other, _)| *other != slot)
            .filter_map(move |(other, _)| self.link(slot, other).map(|s| (other, s)))
    }

    pub(crate) fn link(&self, a: usize, b: usize) -> Option<LinkStats> {
        self.link_index(a, b)
            .and_then(|index| self.links.get(index).copied().flatten())
    }

    /// Merges the clusters in slots `left` and `right` into the lower slot.
    ///
    /// Returns the size of the merged cluster, or `None` when either slot
    /// is empty or the slots coincide.
    pub(crate) fn merge(&mut self, left: usize, right: usize) -> Option<usize> {
        let (survivor, other) = (left.min(right), left.max(right));
        if survivor == other || self.cluster(survivor).is_none() || self.cluster(other).is_none() {
            return None;
        }
        let absorbed = self.slots.get_mut(other)?.take()?;
        let mut merged = self.slots.get_mut(survivor)?.take()?;
        merged.absorb(absorbed, self.has_pivot && survivor == 0);
        let size = merged.len();

        for slot in 0..self.slots.len() {
            if slot == survivor || slot == other || self.cluster(slot).is_none() {
                continue;
            }
            let (Some(kept), Some(dropped)) =
                (self.link_index(survivor, slot), self.link_index(other, slot))
            else {
                continue;
            };
            let dropped = self.links.get_mut(dropped).and_then(Option::take);
            if let Some(entry) = self.links.get_mut(kept) {
                *entry = LinkStats::combine(*entry, dropped);
            }
        }
        if let Some(index) = self.link_index(survivor, other)
            && let Some(entry) = self.links.get_mut(index)
        {
            *entry = None;
        }

        if let Some(slot) = self.slots.get_mut(survivor) {
            *slot = Some(merged);
        }
        for slot in [survivor, other] {
            if let Some(version) = self.versions.get_mut(slot) {
                *version = version.wrapping_add(1);
            }
        }
        self.live -= 1;
        Some(size)
    }

    fn link_index(&self, a: usize, b: usize) -> Option<usize> {
        let (row, column) = match a.cmp(&b) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal => return None,
        };
        if column >= self.slots.len() {
            return None;
        }
        Some(self.row_start.get(row)? + (column - row - 1))
    }
}

fn initial_link<F>(left: &[usize], right: &[usize], distance: &mut F) -> Option<LinkStats>
where
    F: FnMut(usize, usize) -> Option<u64>,
{
    let mut stats: Option<LinkStats> = None;
    for &a in left {
        for &b in right {
            let pair = LinkStats::single(distance(a, b)?);
            stats = match stats {
                Some(acc) => LinkStats::combine(Some(acc), Some(pair)),
                None => Some(pair),
            };
        }
    }
    stats
}
