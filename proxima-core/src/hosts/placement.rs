//! Capacity-driven placement over a [`HostLayout`].
//!
//! A host is free when every node placed on it is among the matched nodes.
//! Exclusive placements only ever reserve free hosts and hand the nodes a
//! request does not need back as extra nodes.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap, HashSet},
    hash::Hash,
};

use tracing::info;

use super::HostLayout;
use crate::{
    error::{Result, SelectionError},
    result::{Selection, Termination},
};

/// Fills the request from the matched nodes of a single host.
///
/// The first host, in layout order, whose capacity covers the request and
/// which still holds that many matched nodes wins. When no host qualifies
/// the request shrinks by one node and the search starts over.
pub(crate) fn place_single_host<H, N>(
    layout: &HostLayout<H, N>,
    number: usize,
    matched: &[N],
) -> Result<Selection<N>>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    let free = matched_set(matched)?;
    let mut wanted = number.min(matched.len());
    while wanted > 0 {
        for nodes in layout.groups().filter(|nodes| nodes.len() >= wanted) {
            let chosen: Vec<N> = nodes
                .iter()
                .filter(|node| free.contains(node))
                .take(wanted)
                .cloned()
                .collect();
            if chosen.len() == wanted {
                return Ok(finish("single-host", number, chosen, Vec::new()));
            }
        }
        wanted -= 1;
    }
    Ok(finish("single-host", number, Vec::new(), Vec::new()))
}

/// Reserves one entirely free host.
///
/// Prefers the smallest free host holding at least `number` nodes and falls
/// back to the largest free host. Ties go to the earlier host.
pub(crate) fn place_single_host_exclusive<H, N>(
    layout: &HostLayout<H, N>,
    number: usize,
    matched: &[N],
) -> Result<Selection<N>>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    let free = matched_set(matched)?;
    if number == 0 {
        return Ok(finish("single-host-exclusive", number, Vec::new(), Vec::new()));
    }
    let hosts = free_hosts(layout, &free);
    let sufficient = hosts
        .iter()
        .filter(|nodes| nodes.len() >= number)
        .min_by_key(|nodes| nodes.len());
    let largest = hosts
        .iter()
        .rev()
        .max_by_key(|nodes| nodes.len());
    let Some(nodes) = sufficient.or(largest) else {
        return Ok(finish("single-host-exclusive", number, Vec::new(), Vec::new()));
    };
    let (chosen, extra) = split_host(nodes, number);
    Ok(finish("single-host-exclusive", number, chosen, extra))
}

/// Reserves as few entirely free hosts as possible.
///
/// Each step takes the largest free host that does not exceed the nodes
/// still needed, or the largest remaining host when every host exceeds it.
/// Surplus nodes of the last host become extra nodes.
///
/// # Errors
/// Returns [`SelectionError::UnplacedNode`] when a matched node has no host.
pub(crate) fn place_multiple_hosts_exclusive<H, N>(
    layout: &HostLayout<H, N>,
    number: usize,
    matched: &[N],
) -> Result<Selection<N>>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    matched_set(matched)?;
    let mut matched_per_host: HashMap<usize, usize> = HashMap::new();
    for (position, node) in matched.iter().enumerate() {
        let slot = layout
            .slot_of(node)
            .ok_or(SelectionError::UnplacedNode { position })?;
        *matched_per_host.entry(slot).or_default() += 1;
    }

    let groups: Vec<&[N]> = layout.groups().collect();
    let mut free: BTreeSet<(usize, Reverse<usize>)> = matched_per_host
        .into_iter()
        .filter(|&(slot, count)| groups.get(slot).is_some_and(|nodes| nodes.len() == count))
        .map(|(slot, count)| (count, Reverse(slot)))
        .collect();

    let mut chosen = Vec::new();
    let mut extra = Vec::new();
    let mut remaining = number;
    while remaining > 0 {
        let pick = free
            .range(..=(remaining, Reverse(0)))
            .next_back()
            .or_else(|| free.last())
            .copied();
        let Some(key @ (_, Reverse(slot))) = pick else {
            break;
        };
        free.remove(&key);
        let Some(nodes) = groups.get(slot) else {
            break;
        };
        let (taken, surplus) = split_host(nodes, remaining);
        remaining -= taken.len();
        chosen.extend(taken);
        extra.extend(surplus);
    }
    Ok(finish("multiple-hosts-exclusive", number, chosen, extra))
}

/// Takes one node from each of `number` entirely free hosts.
///
/// Hosts with fewer nodes are used first so larger hosts stay available.
/// The other nodes of every used host become extra nodes.
pub(crate) fn place_different_hosts_exclusive<H, N>(
    layout: &HostLayout<H, N>,
    number: usize,
    matched: &[N],
) -> Result<Selection<N>>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    let free = matched_set(matched)?;
    let mut hosts = free_hosts(layout, &free);
    hosts.sort_by_key(|nodes| nodes.len());

    let mut chosen = Vec::new();
    let mut extra = Vec::new();
    for nodes in hosts.into_iter().take(number) {
        if let Some((first, rest)) = nodes.split_first() {
            chosen.push(first.clone());
            extra.extend_from_slice(rest);
        }
    }
    Ok(finish("different-hosts-exclusive", number, chosen, extra))
}

fn matched_set<N: Eq + Hash>(matched: &[N]) -> Result<HashSet<&N>> {
    let mut seen = HashSet::with_capacity(matched.len());
    for (position, node) in matched.iter().enumerate() {
        if !seen.insert(node) {
            return Err(SelectionError::DuplicateCandidate { position });
        }
    }
    Ok(seen)
}

fn free_hosts<'a, H, N>(layout: &'a HostLayout<H, N>, free: &HashSet<&N>) -> Vec<&'a [N]>
where
    H: Clone + Eq + Hash,
    N: Clone + Eq + Hash,
{
    layout
        .groups()
        .filter(|nodes| !nodes.is_empty() && nodes.iter().all(|node| free.contains(node)))
        .collect()
}

fn split_host<N: Clone>(nodes: &[N], number: usize) -> (Vec<N>, Vec<N>) {
    let (taken, surplus) = nodes.split_at(number.min(nodes.len()));
    (taken.to_vec(), surplus.to_vec())
}

fn finish<N>(descriptor: &str, number: usize, chosen: Vec<N>, extra: Vec<N>) -> Selection<N> {
    let termination = if chosen.len() >= number {
        Termination::TargetReached
    } else {
        Termination::Exhausted
    };
    info!(
        descriptor,
        selected = chosen.len(),
        extra = extra.len(),
        wanted = number,
        "host placement completed"
    );
    Selection::new(chosen, number, termination, 0).with_extra(extra)
}
