//! Cluster-to-cluster distance functions.
//!
//! A linkage reduces the pairwise distances between the members of two
//! clusters to a single merge cost. Every variant shares one validity rule:
//! if any cross pair has no known distance the clusters cannot be merged.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::topology::Topology;

/// Strategy used to derive the distance between two clusters.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Linkage {
    /// Arithmetic mean of every cross-pair distance, rounded down.
    #[default]
    Average,
    /// Smallest cross-pair distance.
    Minimum,
    /// Largest cross-pair distance.
    Maximum,
}

impl Linkage {
    /// Returns the short name used on command lines and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Average => "avg",
            Self::Minimum => "min",
            Self::Maximum => "max",
        }
    }

    /// Reduces accumulated pair statistics to a merge cost.
    pub(crate) fn cost(self, stats: &LinkStats) -> Option<u64> {
        match self {
            Self::Average => stats
                .sum
                .checked_div(u128::from(stats.pairs))
                .and_then(|mean| u64::try_from(mean).ok()),
            Self::Minimum => Some(stats.min),
            Self::Maximum => Some(stats.max),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a linkage name cannot be parsed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown linkage `{input}`; expected `avg`, `min` or `max`")]
pub struct ParseLinkageError {
    input: String,
}

impl ParseLinkageError {
    /// Returns the rejected input.
    #[must_use]
    #[rustfmt::skip]
    pub fn input(&self) -> &str { &self.input }
}

impl FromStr for Linkage {
    type Err = ParseLinkageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" => Ok(Self::Average),
            "min" | "minimum" => Ok(Self::Minimum),
            "max" | "maximum" => Ok(Self::Maximum),
            _ => Err(ParseLinkageError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Running statistics over the known cross-pair distances of two clusters.
///
/// Statistics combine associatively, so the link between a merged cluster
/// and a third cluster is the combination of both constituents' links.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LinkStats {
    sum: u128,
    pairs: u64,
    min: u64,
    max: u64,
}

impl LinkStats {
    /// Statistics for a single known pair.
    pub(crate) fn single(distance: u64) -> Self {
        Self {
            sum: u128::from(distance),
            pairs: 1,
            min: distance,
            max: distance,
        }
    }

    /// Combines two disjoint sets of pair statistics.
    ///
    /// An unknown side poisons the result: a cluster with even one
    /// unreachable cross pair cannot be linked.
    pub(crate) fn combine(left: Option<Self>, right: Option<Self>) -> Option<Self> {
        let (left, right) = (left?, right?);
        Some(Self {
            sum: left.sum.saturating_add(right.sum),
            pairs: left.pairs.saturating_add(right.pairs),
            min: left.min.min(right.min),
            max: left.max.max(right.max),
        })
    }

    #[cfg(test)]
    pub(crate) fn pairs(&self) -> u64 {
        self.pairs
    }
}

/// Computes the linkage cost between two node groups directly.
///
/// Returns `None` when either group is empty or when any cross pair has no
/// known distance. The clustering engine maintains the same statistics
/// incrementally; this function is the reference form.
///
/// # Examples
/// ```
/// use proxima_core::{Linkage, TopologyMap, linkage_cost};
///
/// let mut topology = TopologyMap::new("demo");
/// topology.insert(1, 3, 4);
/// topology.insert(2, 3, 10);
///
/// assert_eq!(linkage_cost(Linkage::Average, &topology, &[1, 2], &[3]), Some(7));
/// assert_eq!(linkage_cost(Linkage::Minimum, &topology, &[1, 2], &[3]), Some(4));
/// assert_eq!(linkage_cost(Linkage::Maximum, &topology, &[1, 2], &[3]), Some(10));
/// assert_eq!(linkage_cost(Linkage::Average, &topology, &[1], &[2]), None);
/// ```
pub fn linkage_cost<N, T>(linkage: Linkage, topology: &T, left: &[N], right: &[N]) -> Option<u64>
where
    T: Topology<N> + ?Sized,
{
    let mut stats: Option<LinkStats> = None;
    for a in left {
        for b in right {
            let pair = LinkStats::single(topology.distance(a, b)?);
            stats = Some(match stats {
                Some(acc) => LinkStats::combine(Some(acc), Some(pair))?,
                None => pair,
            });
        }
    }
    linkage.cost(&stats?)
}
