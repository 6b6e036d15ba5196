//! Grouping of nodes by the host machine they run on.
//!
//! Host-based descriptors place a request by host capacity rather than by
//! measured distance. A [`HostLayout`] lists every node of every host, busy
//! or not; the matched nodes of a request are the free ones.

mod placement;

use std::{collections::HashMap, hash::Hash};

pub(crate) use self::placement::{
    place_different_hosts_exclusive, place_multiple_hosts_exclusive, place_single_host,
    place_single_host_exclusive,
};

/// Nodes grouped by host, in registration order.
///
/// # Examples
/// ```
/// use proxima_core::HostLayout;
///
/// let mut layout = HostLayout::new();
/// layout.add_node("rack-a", "a1");
/// layout.add_node("rack-a", "a2");
/// layout.add_node("rack-b", "b1");
///
/// assert_eq!(layout.nodes_on(&"rack-a"), Some(["a1", "a2"].as_slice()));
/// assert_eq!(layout.host_of(&"b1"), Some(&"rack-b"));
/// assert_eq!(layout.len(), 2);
/// assert_eq!(layout.node_count(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct HostLayout<H, N> {
    hosts: Vec<(H, Vec<N>)>,
    slots: HashMap<H, usize>,
    placed: HashMap<N, H>,
}

impl<H, N> Default for HostLayout<H, N> {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            slots: HashMap::new(),
            placed: HashMap::new(),
        }
    }
}

impl<H, N> HostLayout<H, N>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of hosts holding at least one node.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.hosts.len() }

    /// Returns whether no node has been placed.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.hosts.is_empty() }

    /// Returns the number of placed nodes across all hosts.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.placed.len() }

    /// Places `node` on `host`.
    ///
    /// Returns `false`, leaving the layout unchanged, when the node is
    /// already placed on any host.
    pub fn add_node(&mut self, host: H, node: N) -> bool {
        if self.placed.contains_key(&node) {
            return false;
        }
        self.placed.insert(node.clone(), host.clone());
        if let Some(&slot) = self.slots.get(&host) {
            if let Some((_, nodes)) = self.hosts.get_mut(slot) {
                nodes.push(node);
            }
        } else {
            self.slots.insert(host.clone(), self.hosts.len());
            self.hosts.push((host, vec![node]));
        }
        true
    }

    /// Removes `node` from its host, dropping the host once it is empty.
    ///
    /// Returns `false` when the node was not placed.
    pub fn remove_node(&mut self, node: &N) -> bool {
        let Some(host) = self.placed.remove(node) else {
            return false;
        };
        let Some(&slot) = self.slots.get(&host) else {
            return true;
        };
        let emptied = self.hosts.get_mut(slot).is_some_and(|(_, nodes)| {
            nodes.retain(|placed| placed != node);
            nodes.is_empty()
        });
        if emptied {
            self.hosts.remove(slot);
            self.slots.remove(&host);
            for position in self.slots.values_mut() {
                if *position > slot {
                    *position -= 1;
                }
            }
        }
        true
    }

    /// Returns the nodes placed on `host` in registration order.
    #[must_use]
    pub fn nodes_on(&self, host: &H) -> Option<&[N]> {
        let slot = *self.slots.get(host)?;
        self.hosts.get(slot).map(|(_, nodes)| nodes.as_slice())
    }

    /// Returns the host `node` is placed on.
    #[must_use]
    pub fn host_of(&self, node: &N) -> Option<&H> {
        self.placed.get(node)
    }

    /// Iterates over hosts and their nodes in registration order.
    pub fn hosts(&self) -> impl Iterator<Item = (&H, &[N])> {
        self.hosts.iter().map(|(host, nodes)| (host, nodes.as_slice()))
    }

    fn slot_of(&self, node: &N) -> Option<usize> {
        self.slots.get(self.placed.get(node)?).copied()
    }

    fn groups(&self) -> impl Iterator<Item = &[N]> {
        self.hosts.iter().map(|(_, nodes)| nodes.as_slice())
    }
}

impl<H, N> FromIterator<(H, N)> for HostLayout<H, N>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (H, N)>>(iter: I) -> Self {
        let mut layout = Self::new();
        for (host, node) in iter {
            layout.add_node(host, node);
        }
        layout
    }
}
