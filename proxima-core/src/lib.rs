//! Proxima core library.
//!
//! Selects groups of compute nodes that sit close together according to a
//! [`Topology`] distance oracle. The heart of the crate is [`Hac`], a greedy
//! hierarchical agglomerative clustering engine that grows clusters of
//! candidate nodes by repeatedly merging the cheapest valid pair under a
//! [`Linkage`] function and an inclusive distance threshold.
//!
//! # Determinism
//!
//! Equal-cost merges are resolved by pool slot: the pair whose lower slot is
//! smallest wins, then the pair whose higher slot is smallest. Slots follow
//! the caller's candidate order (pivot members first) and a merged cluster
//! keeps the lower of its two slots, so identical inputs always yield
//! identical selections.
//!
//! # Host placement
//!
//! Requests that care about machines rather than distances are placed over
//! a [`HostLayout`] through [`NodeSelector::select_with_hosts`]. Exclusive
//! placements reserve whole hosts and report the unrequested nodes of those
//! hosts as [`Selection::extra_nodes`].
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled the engine emits:
//!
//! - `hac_selections_total` (counter)
//! - `hac_merges_total` (counter)
//! - `hac_unsatisfied_selections_total` (counter)
//!
//! These metric names are stable for downstream crates.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod hac;
mod hosts;
mod linkage;
mod result;
mod selection;
mod topology;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{HacBuilder, PivotCounting},
    error::{Result, SelectionError, SelectionErrorCode},
    hac::Hac,
    hosts::HostLayout,
    linkage::{Linkage, ParseLinkageError, linkage_cost},
    result::{Selection, Termination},
    selection::{DescriptorKind, NodeSelector, SelectionPolicy, TopologyDescriptor},
    topology::{Topology, TopologyMap},
};
