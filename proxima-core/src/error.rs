//! Error types for the Proxima core library.
//!
//! Defines the error enum exposed by the public API and a convenient result
//! alias. An undersized selection is not an error: it is reported through
//! [`crate::Selection::is_satisfied`].

use std::fmt;

use thiserror::Error;

use crate::selection::DescriptorKind;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when a selection request is rejected.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SelectionError {
    /// The same node appeared more than once in the candidate list.
    #[error("candidate at position {position} duplicates an earlier candidate")]
    DuplicateCandidate {
        /// Zero-based position of the repeated candidate.
        position: usize,
    },
    /// The same node appeared more than once in the pivot list.
    #[error("pivot member at position {position} duplicates an earlier pivot member")]
    DuplicatePivotMember {
        /// Zero-based position of the repeated pivot member.
        position: usize,
    },
    /// A pivot was supplied but contained no nodes.
    #[error("pivot must contain at least one node when supplied")]
    EmptyPivot,
    /// A topology-based descriptor was used while topology is disabled.
    #[error("topology is disabled; cannot serve a `{descriptor}` request")]
    TopologyDisabled {
        /// Descriptor that required topology information.
        descriptor: DescriptorKind,
    },
    /// A distance-based descriptor was used while distance measurement is
    /// disabled.
    #[error("topology distance is disabled; cannot serve a `{descriptor}` request")]
    DistanceDisabled {
        /// Descriptor that required distance information.
        descriptor: DescriptorKind,
    },
    /// A host-based descriptor was served without a host layout.
    #[error("a `{descriptor}` request needs a host layout")]
    HostLayoutRequired {
        /// Descriptor that required the host layout.
        descriptor: DescriptorKind,
    },
    /// A matched node is not placed on any host of the layout.
    #[error("matched node at position {position} is not placed on any host")]
    UnplacedNode {
        /// Zero-based position of the node in the matched list.
        position: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SelectionError`] variants.
    enum SelectionErrorCode for SelectionError {
        /// The same node appeared more than once in the candidate list.
        DuplicateCandidate => DuplicateCandidate { .. } => "PROXIMA_DUPLICATE_CANDIDATE",
        /// The same node appeared more than once in the pivot list.
        DuplicatePivotMember => DuplicatePivotMember { .. } => "PROXIMA_DUPLICATE_PIVOT_MEMBER",
        /// A pivot was supplied but contained no nodes.
        EmptyPivot => EmptyPivot => "PROXIMA_EMPTY_PIVOT",
        /// Topology is disabled for topology-based descriptors.
        TopologyDisabled => TopologyDisabled { .. } => "PROXIMA_TOPOLOGY_DISABLED",
        /// Distance measurement is disabled for distance-based descriptors.
        DistanceDisabled => DistanceDisabled { .. } => "PROXIMA_DISTANCE_DISABLED",
        /// A host-based descriptor was served without a host layout.
        HostLayoutRequired => HostLayoutRequired { .. } => "PROXIMA_HOST_LAYOUT_REQUIRED",
        /// A matched node has no host in the layout.
        UnplacedNode => UnplacedNode { .. } => "PROXIMA_UNPLACED_NODE",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SelectionError>;
