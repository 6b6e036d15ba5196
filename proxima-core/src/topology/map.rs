//! In-memory symmetric topology keyed by host.

use std::{
    collections::{HashMap, hash_map::Entry},
    hash::Hash,
};

use super::Topology;

/// Symmetric host-to-host distance map held entirely in memory.
///
/// Every distance is stored in both directions, so the map satisfies the
/// [`Topology`] symmetry contract by construction. Raw measurements may be
/// recorded with [`TopologyMap::insert_measured`], where a negative value
/// marks the pair as unreachable.
///
/// # Examples
/// ```
/// use proxima_core::{Topology, TopologyMap};
///
/// let mut topology = TopologyMap::new("lab");
/// topology.insert("a", "b", 2);
/// topology.insert_measured("a", "c", -1);
///
/// assert_eq!(topology.distance(&"b", &"a"), Some(2));
/// assert_eq!(topology.distance(&"a", &"c"), None);
/// assert_eq!(topology.distance(&"c", &"c"), Some(0));
/// assert_eq!(topology.len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct TopologyMap<N> {
    name: String,
    hosts: HashMap<N, HashMap<N, u64>>,
    edges: usize,
}

impl<N> TopologyMap<N>
where
    N: Clone + Eq + Hash,
{
    /// Creates an empty topology with the given diagnostic name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: HashMap::new(),
            edges: 0,
        }
    }

    /// Returns the number of known hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns whether no host is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Returns the number of host pairs with a known distance.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Returns whether `host` has been registered.
    #[must_use]
    pub fn knows(&self, host: &N) -> bool {
        self.hosts.contains_key(host)
    }

    /// Iterates over the known hosts in unspecified order.
    pub fn hosts(&self) -> impl Iterator<Item = &N> {
        self.hosts.keys()
    }

    /// Registers `host` without recording any distance.
    ///
    /// Returns `true` when the host was not known before.
    pub fn add_host(&mut self, host: N) -> bool {
        match self.hosts.entry(host) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(HashMap::new());
                true
            }
        }
    }

    /// Records a known distance between two hosts, registering both.
    ///
    /// A self pair only registers the host; its distance is always zero.
    pub fn insert(&mut self, left: N, right: N, distance: u64) {
        if left == right {
            self.add_host(left);
            return;
        }
        let previous = self
            .hosts
            .entry(left.clone())
            .or_default()
            .insert(right.clone(), distance);
        self.hosts.entry(right).or_default().insert(left, distance);
        if previous.is_none() {
            self.edges = self.edges.saturating_add(1);
        }
    }

    /// Records a raw measurement where a negative value means "no edge".
    ///
    /// Both hosts are registered either way. A negative measurement removes
    /// any distance previously recorded for the pair.
    pub fn insert_measured(&mut self, left: N, right: N, raw: i64) {
        match u64::try_from(raw) {
            Ok(distance) => self.insert(left, right, distance),
            Err(_) => {
                self.unlink(&left, &right);
                self.add_host(left);
                self.add_host(right);
            }
        }
    }

    /// Registers `host` together with its raw measurements to other hosts.
    ///
    /// Negative measurements are treated as unknown edges, as with
    /// [`TopologyMap::insert_measured`].
    pub fn add_host_topology<I>(&mut self, host: N, distances: I)
    where
        I: IntoIterator<Item = (N, i64)>,
    {
        self.add_host(host.clone());
        for (other, raw) in distances {
            self.insert_measured(host.clone(), other, raw);
        }
    }

    /// Removes `host` and every distance involving it.
    ///
    /// Returns `false` when the host was not known.
    pub fn remove_host(&mut self, host: &N) -> bool {
        let Some(neighbours) = self.hosts.remove(host) else {
            return false;
        };
        for neighbour in neighbours.keys() {
            if let Some(reverse) = self.hosts.get_mut(neighbour) {
                reverse.remove(host);
            }
        }
        self.edges = self.edges.saturating_sub(neighbours.len());
        true
    }

    fn unlink(&mut self, left: &N, right: &N) {
        let removed = self
            .hosts
            .get_mut(left)
            .and_then(|neighbours| neighbours.remove(right));
        if let Some(reverse) = self.hosts.get_mut(right) {
            reverse.remove(left);
        }
        if removed.is_some() {
            self.edges = self.edges.saturating_sub(1);
        }
    }
}

impl<N> Topology<N> for TopologyMap<N>
where
    N: Clone + Eq + Hash,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, left: &N, right: &N) -> Option<u64> {
        let neighbours = self.hosts.get(left)?;
        if left == right {
            return Some(0);
        }
        neighbours.get(right).copied()
    }
}
