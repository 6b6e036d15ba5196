//! Shared test utilities used across proxima crates.

pub mod ci;
pub mod tracing;
