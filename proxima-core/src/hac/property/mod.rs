//! Property-based tests for the clustering engine.
//!
//! Verifies the incremental engine against a brute-force reference that
//! recomputes every linkage from the topology on every iteration, and
//! checks the selection invariants over random topologies, pivots,
//! thresholds and targets.

mod equivalence;
mod invariants;
mod oracle;
mod strategies;
mod types;
