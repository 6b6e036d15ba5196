//! Benchmark support crate for proxima.
//!
//! Provides seeded grid topologies and parameter types used by the
//! Criterion benchmarks of the clustering engine.

pub mod error;
pub mod grid;
pub mod params;
