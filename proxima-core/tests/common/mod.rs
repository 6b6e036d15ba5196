use proxima_core::TopologyMap;

/// Builds a topology over `u32` nodes from `(left, right, distance)` edges.
#[must_use]
pub fn edges(name: &str, edges: &[(u32, u32, u64)]) -> TopologyMap<u32> {
    let mut topology = TopologyMap::new(name);
    for &(left, right, distance) in edges {
        topology.insert(left, right, distance);
    }
    topology
}
