//! Seeded grid topologies.
//!
//! Nodes occupy a random subset of the cells of a square grid and sit at
//! their Manhattan distance from each other, which mimics racks of hosts
//! whose latency grows with physical separation.

use proxima_core::TopologyMap;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

/// Configuration for [`GridTopology::generate`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Number of cells along each side of the grid.
    pub side: u32,
    /// Probability that a cell holds a node.
    pub density: f64,
    /// Probability that the distance between two nodes is unknown.
    pub missing_edge_ratio: f64,
    /// Seed for the deterministic generator.
    pub seed: u64,
}

impl GridConfig {
    /// A fully measured `side` x `side` grid at the given density.
    #[must_use]
    pub const fn new(side: u32, density: f64, seed: u64) -> Self {
        Self {
            side,
            density,
            missing_edge_ratio: 0.0,
            seed,
        }
    }

    /// Sets the probability that a node pair has no known distance.
    #[must_use]
    pub const fn with_missing_edge_ratio(mut self, ratio: f64) -> Self {
        self.missing_edge_ratio = ratio;
        self
    }
}

/// Errors raised while generating a grid topology.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GridError {
    /// The grid has no cells.
    #[error("grid side must be positive")]
    ZeroSide,
    /// The grid side is too large to number its cells.
    #[error("grid side {side} is too large")]
    SideTooLarge {
        /// Requested side.
        side: u32,
    },
    /// A probability lies outside `0.0..=1.0`.
    #[error("{parameter} must lie within 0.0..=1.0")]
    InvalidProbability {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
    /// No cell received a node.
    #[error("grid with side {side} produced no nodes")]
    Empty {
        /// Requested side.
        side: u32,
    },
}

/// Grid-shaped topology together with its nodes in row-major order.
#[derive(Clone, Debug)]
pub struct GridTopology {
    side: u32,
    nodes: Vec<u32>,
    topology: TopologyMap<u32>,
}

impl GridTopology {
    /// Generates a grid topology from `config`.
    ///
    /// Node identifiers are `row * side + column`.
    ///
    /// # Errors
    /// Returns [`GridError`] for an empty or oversized grid, probabilities
    /// outside `0.0..=1.0`, or a draw that placed no node.
    ///
    /// # Examples
    /// ```
    /// use proxima_benches::grid::{GridConfig, GridTopology};
    /// use proxima_core::Topology;
    ///
    /// let grid = GridTopology::generate(&GridConfig::new(4, 1.0, 7))?;
    /// assert_eq!(grid.len(), 16);
    /// assert_eq!(grid.topology().distance(&0, &15), Some(6));
    /// # Ok::<(), proxima_benches::grid::GridError>(())
    /// ```
    pub fn generate(config: &GridConfig) -> Result<Self, GridError> {
        validate(config)?;
        let side = config.side;
        let cells = side
            .checked_mul(side)
            .ok_or(GridError::SideTooLarge { side })?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let nodes: Vec<u32> = (0..cells)
            .filter(|_| rng.gen_bool(config.density))
            .collect();
        if nodes.is_empty() {
            return Err(GridError::Empty { side });
        }

        let mut topology = TopologyMap::new(format!("grid-{side}x{side}"));
        for (position, &left) in nodes.iter().enumerate() {
            topology.add_host(left);
            for &right in nodes.iter().skip(position + 1) {
                if rng.gen_bool(config.missing_edge_ratio) {
                    continue;
                }
                topology.insert(left, right, manhattan(side, left, right));
            }
        }
        Ok(Self {
            side,
            nodes,
            topology,
        })
    }

    /// Returns the grid side.
    #[must_use]
    #[rustfmt::skip]
    pub const fn side(&self) -> u32 { self.side }

    /// Returns the nodes in row-major order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[u32] { &self.nodes }

    /// Returns the number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns whether the grid holds no node. Always `false` for a
    /// generated grid.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the topology.
    #[must_use]
    #[rustfmt::skip]
    pub const fn topology(&self) -> &TopologyMap<u32> { &self.topology }
}

fn validate(config: &GridConfig) -> Result<(), GridError> {
    if config.side == 0 {
        return Err(GridError::ZeroSide);
    }
    for (parameter, value) in [
        ("density", config.density),
        ("missing_edge_ratio", config.missing_edge_ratio),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(GridError::InvalidProbability { parameter });
        }
    }
    Ok(())
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "cell coordinates are the quotient and remainder of the identifier"
)]
fn manhattan(side: u32, left: u32, right: u32) -> u64 {
    let (left_row, left_column) = (left / side, left % side);
    let (right_row, right_column) = (right / side, right % side);
    u64::from(left_row.abs_diff(right_row)) + u64::from(left_column.abs_diff(right_column))
}
