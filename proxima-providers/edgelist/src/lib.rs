//! Edge-list provider loading a [`proxima_core::TopologyMap`] from text.
//!
//! One record per line, whitespace separated:
//!
//! ```text
//! # comment
//! node-a node-b 12   # known distance
//! node-a node-c -    # unknown edge (also `?` or a negative number)
//! node-d             # node without edges
//! ```

mod errors;
mod parse;
mod provider;

pub use errors::EdgeListError;
pub use provider::EdgeListProvider;

#[cfg(test)]
mod tests;
