//! Descriptor-driven node selection.
//!
//! A [`TopologyDescriptor`] states how a multi-node request should be
//! placed. [`NodeSelector`] checks the descriptor against the active
//! [`SelectionPolicy`] and then takes matched nodes in order, places the
//! request by host capacity over a [`HostLayout`], or hands it to the
//! clustering engine.

use std::{fmt, hash::Hash};

use tracing::{info, instrument};

use crate::{
    builder::{HacBuilder, PivotCounting},
    error::{Result, SelectionError},
    hosts::{
        HostLayout, place_different_hosts_exclusive, place_multiple_hosts_exclusive,
        place_single_host, place_single_host_exclusive,
    },
    linkage::Linkage,
    result::{Selection, Termination},
    topology::Topology,
};

/// Placement constraint attached to a multi-node request.
///
/// # Examples
/// ```
/// use proxima_core::{DescriptorKind, Linkage, TopologyDescriptor};
///
/// let descriptor = TopologyDescriptor::threshold_proximity(50)
///     .with_linkage(Linkage::Maximum)
///     .with_pivot(vec!["head"]);
/// assert_eq!(descriptor.kind(), DescriptorKind::ThresholdProximity);
/// assert!(descriptor.is_distance_based());
/// assert_eq!(descriptor.pivot(), Some(["head"].as_slice()));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TopologyDescriptor<N> {
    /// Any matched nodes will do; topology is ignored.
    Arbitrary,
    /// The closest group of nodes, without a distance cap.
    BestProximity {
        /// Linkage used to cost merges.
        linkage: Linkage,
        /// Nodes the selection must be grown around.
        pivot: Option<Vec<N>>,
    },
    /// The closest group of nodes whose merges stay within `threshold`.
    ThresholdProximity {
        /// Inclusive upper bound on a single merge's cost.
        threshold: u64,
        /// Linkage used to cost merges.
        linkage: Linkage,
        /// Nodes the selection must be grown around.
        pivot: Option<Vec<N>>,
    },
    /// Matched nodes sharing one host.
    SingleHost,
    /// One entirely free host reserved for the request.
    SingleHostExclusive,
    /// As few entirely free hosts as possible reserved for the request.
    MultipleHostsExclusive,
    /// One node on each of several entirely free hosts.
    DifferentHostsExclusive,
}

impl<N> Default for TopologyDescriptor<N> {
    fn default() -> Self {
        Self::Arbitrary
    }
}

impl<N> TopologyDescriptor<N> {
    /// Best-proximity descriptor with average linkage and no pivot.
    #[must_use]
    pub fn best_proximity() -> Self {
        Self::BestProximity {
            linkage: Linkage::default(),
            pivot: None,
        }
    }

    /// Threshold-proximity descriptor with average linkage and no pivot.
    #[must_use]
    pub fn threshold_proximity(threshold: u64) -> Self {
        Self::ThresholdProximity {
            threshold,
            linkage: Linkage::default(),
            pivot: None,
        }
    }

    /// Sets the pivot of a proximity descriptor.
    ///
    /// Has no effect on other descriptors.
    #[must_use]
    pub fn with_pivot(mut self, nodes: Vec<N>) -> Self {
        if let Self::BestProximity { pivot, .. } | Self::ThresholdProximity { pivot, .. } =
            &mut self
        {
            *pivot = Some(nodes);
        }
        self
    }

    /// Sets the linkage of a proximity descriptor.
    ///
    /// Has no effect on other descriptors.
    #[must_use]
    pub fn with_linkage(mut self, value: Linkage) -> Self {
        if let Self::BestProximity { linkage, .. } | Self::ThresholdProximity { linkage, .. } =
            &mut self
        {
            *linkage = value;
        }
        self
    }

    /// Returns the pivot of a proximity descriptor.
    #[must_use]
    pub fn pivot(&self) -> Option<&[N]> {
        match self {
            Self::BestProximity { pivot, .. } | Self::ThresholdProximity { pivot, .. } => {
                pivot.as_deref()
            }
            _ => None,
        }
    }

    /// Returns whether serving the descriptor needs topology information.
    #[must_use]
    pub fn is_topology_based(&self) -> bool {
        !matches!(self, Self::Arbitrary)
    }

    /// Returns whether serving the descriptor needs a [`HostLayout`].
    #[must_use]
    pub fn is_host_based(&self) -> bool {
        matches!(
            self,
            Self::SingleHost
                | Self::SingleHostExclusive
                | Self::MultipleHostsExclusive
                | Self::DifferentHostsExclusive
        )
    }

    /// Returns whether serving the descriptor needs measured distances.
    #[must_use]
    pub fn is_distance_based(&self) -> bool {
        matches!(
            self,
            Self::BestProximity { .. } | Self::ThresholdProximity { .. }
        )
    }

    /// Returns the descriptor's kind without its parameters.
    #[must_use]
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::Arbitrary => DescriptorKind::Arbitrary,
            Self::BestProximity { .. } => DescriptorKind::BestProximity,
            Self::ThresholdProximity { .. } => DescriptorKind::ThresholdProximity,
            Self::SingleHost => DescriptorKind::SingleHost,
            Self::SingleHostExclusive => DescriptorKind::SingleHostExclusive,
            Self::MultipleHostsExclusive => DescriptorKind::MultipleHostsExclusive,
            Self::DifferentHostsExclusive => DescriptorKind::DifferentHostsExclusive,
        }
    }
}

/// Parameter-free identifier of a [`TopologyDescriptor`] variant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DescriptorKind {
    /// [`TopologyDescriptor::Arbitrary`].
    Arbitrary,
    /// [`TopologyDescriptor::BestProximity`].
    BestProximity,
    /// [`TopologyDescriptor::ThresholdProximity`].
    ThresholdProximity,
    /// [`TopologyDescriptor::SingleHost`].
    SingleHost,
    /// [`TopologyDescriptor::SingleHostExclusive`].
    SingleHostExclusive,
    /// [`TopologyDescriptor::MultipleHostsExclusive`].
    MultipleHostsExclusive,
    /// [`TopologyDescriptor::DifferentHostsExclusive`].
    DifferentHostsExclusive,
}

impl DescriptorKind {
    /// Returns the stable name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arbitrary => "arbitrary",
            Self::BestProximity => "best-proximity",
            Self::ThresholdProximity => "threshold-proximity",
            Self::SingleHost => "single-host",
            Self::SingleHostExclusive => "single-host-exclusive",
            Self::MultipleHostsExclusive => "multiple-hosts-exclusive",
            Self::DifferentHostsExclusive => "different-hosts-exclusive",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Switches controlling which descriptors may be served.
///
/// # Examples
/// ```
/// use proxima_core::SelectionPolicy;
///
/// let policy = SelectionPolicy::new().with_distance_enabled(false);
/// assert!(policy.topology_enabled());
/// assert!(!policy.distance_enabled());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelectionPolicy {
    topology_enabled: bool,
    distance_enabled: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            topology_enabled: true,
            distance_enabled: true,
        }
    }
}

impl SelectionPolicy {
    /// Creates a policy with topology and distance measurement enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables topology-based descriptors.
    #[must_use]
    pub fn with_topology_enabled(mut self, enabled: bool) -> Self {
        self.topology_enabled = enabled;
        self
    }

    /// Enables or disables distance-based descriptors.
    #[must_use]
    pub fn with_distance_enabled(mut self, enabled: bool) -> Self {
        self.distance_enabled = enabled;
        self
    }

    /// Returns whether topology-based descriptors may be served.
    #[must_use]
    #[rustfmt::skip]
    pub fn topology_enabled(&self) -> bool { self.topology_enabled }

    /// Returns whether distance-based descriptors may be served.
    #[must_use]
    #[rustfmt::skip]
    pub fn distance_enabled(&self) -> bool { self.distance_enabled }

    /// Checks that `descriptor` may be served under this policy.
    ///
    /// # Errors
    /// Returns [`SelectionError::TopologyDisabled`] or
    /// [`SelectionError::DistanceDisabled`] when the descriptor needs a
    /// disabled capability.
    pub fn check<N>(&self, descriptor: &TopologyDescriptor<N>) -> Result<()> {
        if descriptor.is_topology_based() && !self.topology_enabled {
            return Err(SelectionError::TopologyDisabled {
                descriptor: descriptor.kind(),
            });
        }
        if descriptor.is_distance_based() && !self.distance_enabled {
            return Err(SelectionError::DistanceDisabled {
                descriptor: descriptor.kind(),
            });
        }
        Ok(())
    }
}

/// Serves node requests according to their [`TopologyDescriptor`].
///
/// # Examples
/// ```
/// use proxima_core::{NodeSelector, TopologyDescriptor, TopologyMap};
///
/// let mut topology = TopologyMap::new("lab");
/// topology.insert("a", "b", 9);
/// topology.insert("b", "c", 1);
///
/// let selector = NodeSelector::default();
/// let matched = ["a", "b", "c"];
///
/// let any = selector.select(&TopologyDescriptor::Arbitrary, 2, &matched, &topology)?;
/// assert_eq!(any.nodes(), ["a", "b"]);
///
/// let close = selector.select(&TopologyDescriptor::best_proximity(), 2, &matched, &topology)?;
/// assert_eq!(close.nodes(), ["b", "c"]);
/// # Ok::<(), proxima_core::SelectionError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeSelector {
    policy: SelectionPolicy,
    pivot_counting: PivotCounting,
}

impl NodeSelector {
    /// Creates a selector enforcing `policy`.
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            pivot_counting: PivotCounting::default(),
        }
    }

    /// Chooses how pivot members count towards the requested number.
    #[must_use]
    pub fn with_pivot_counting(mut self, counting: PivotCounting) -> Self {
        self.pivot_counting = counting;
        self
    }

    /// Returns the policy this selector enforces.
    #[must_use]
    #[rustfmt::skip]
    pub fn policy(&self) -> SelectionPolicy { self.policy }

    /// Selects up to `number` of the `matched` nodes for `descriptor`.
    ///
    /// Arbitrary requests take matched nodes in order. Proximity requests
    /// run the clustering engine with the descriptor's linkage, threshold
    /// and pivot. Host-based requests need a layout; serve them with
    /// [`NodeSelector::select_with_hosts`].
    ///
    /// # Errors
    /// Returns a policy error when the descriptor needs a disabled
    /// capability, [`SelectionError::HostLayoutRequired`] for host-based
    /// descriptors, and the engine's input errors for proximity requests.
    pub fn select<N, T>(
        &self,
        descriptor: &TopologyDescriptor<N>,
        number: usize,
        matched: &[N],
        topology: &T,
    ) -> Result<Selection<N>>
    where
        N: Clone + Eq + Hash,
        T: Topology<N> + ?Sized,
    {
        self.dispatch(descriptor, number, matched, topology, None::<&HostLayout<(), N>>)
    }

    /// Selects up to `number` of the `matched` nodes, placing host-based
    /// requests over `hosts`.
    ///
    /// `hosts` lists every node of every host; matched nodes are the free
    /// ones. Exclusive placements report the unrequested nodes of reserved
    /// hosts through [`Selection::extra_nodes`].
    ///
    /// # Errors
    /// Returns a policy error when the descriptor needs a disabled
    /// capability, [`SelectionError::UnplacedNode`] when a
    /// multiple-hosts-exclusive request matches a node without a host, and
    /// the engine's input errors for proximity requests.
    ///
    /// # Examples
    /// ```
    /// use proxima_core::{HostLayout, NodeSelector, TopologyDescriptor, TopologyMap};
    ///
    /// let layout: HostLayout<_, _> =
    ///     [("big", "b1"), ("big", "b2"), ("big", "b3"), ("small", "s1"), ("small", "s2")]
    ///         .into_iter()
    ///         .collect();
    /// let matched = ["b1", "b2", "b3", "s1", "s2"];
    /// let topology = TopologyMap::new("lab");
    ///
    /// let selection = NodeSelector::default().select_with_hosts(
    ///     &TopologyDescriptor::SingleHostExclusive,
    ///     1,
    ///     &matched,
    ///     &topology,
    ///     &layout,
    /// )?;
    /// assert_eq!(selection.nodes(), ["s1"]);
    /// assert_eq!(selection.extra_nodes(), ["s2"]);
    /// # Ok::<(), proxima_core::SelectionError>(())
    /// ```
    pub fn select_with_hosts<N, T, H>(
        &self,
        descriptor: &TopologyDescriptor<N>,
        number: usize,
        matched: &[N],
        topology: &T,
        hosts: &HostLayout<H, N>,
    ) -> Result<Selection<N>>
    where
        N: Clone + Eq + Hash,
        T: Topology<N> + ?Sized,
        H: Clone + Eq + Hash,
    {
        self.dispatch(descriptor, number, matched, topology, Some(hosts))
    }

    #[instrument(
        name = "selection.select",
        err,
        skip(self, descriptor, matched, topology, hosts),
        fields(descriptor = %descriptor.kind(), number = number, matched = matched.len()),
    )]
    fn dispatch<N, T, H>(
        &self,
        descriptor: &TopologyDescriptor<N>,
        number: usize,
        matched: &[N],
        topology: &T,
        hosts: Option<&HostLayout<H, N>>,
    ) -> Result<Selection<N>>
    where
        N: Clone + Eq + Hash,
        T: Topology<N> + ?Sized,
        H: Clone + Eq + Hash,
    {
        self.policy.check(descriptor)?;
        let (linkage, threshold, pivot) = match descriptor {
            TopologyDescriptor::Arbitrary => return Ok(take_arbitrary(number, matched)),
            TopologyDescriptor::BestProximity { linkage, pivot } => {
                (*linkage, u64::MAX, pivot.as_deref())
            }
            TopologyDescriptor::ThresholdProximity {
                threshold,
                linkage,
                pivot,
            } => (*linkage, *threshold, pivot.as_deref()),
            TopologyDescriptor::SingleHost => {
                return place_single_host(require_layout(descriptor, hosts)?, number, matched);
            }
            TopologyDescriptor::SingleHostExclusive => {
                let layout = require_layout(descriptor, hosts)?;
                return place_single_host_exclusive(layout, number, matched);
            }
            TopologyDescriptor::MultipleHostsExclusive => {
                let layout = require_layout(descriptor, hosts)?;
                return place_multiple_hosts_exclusive(layout, number, matched);
            }
            TopologyDescriptor::DifferentHostsExclusive => {
                let layout = require_layout(descriptor, hosts)?;
                return place_different_hosts_exclusive(layout, number, matched);
            }
        };
        HacBuilder::new()
            .with_linkage(linkage)
            .with_threshold(threshold)
            .with_pivot_counting(self.pivot_counting)
            .build()
            .select(number, matched, pivot, topology)
    }
}

fn require_layout<'a, N, H>(
    descriptor: &TopologyDescriptor<N>,
    hosts: Option<&'a HostLayout<H, N>>,
) -> Result<&'a HostLayout<H, N>> {
    hosts.ok_or(SelectionError::HostLayoutRequired {
        descriptor: descriptor.kind(),
    })
}

fn take_arbitrary<N: Clone>(number: usize, matched: &[N]) -> Selection<N> {
    let nodes: Vec<N> = matched.iter().take(number).cloned().collect();
    let termination = if nodes.len() >= number {
        Termination::TargetReached
    } else {
        Termination::Exhausted
    };
    info!(selected = nodes.len(), wanted = number, "arbitrary selection completed");
    Selection::new(nodes, number, termination, 0)
}
