//! Edge-list provider implementation.

use std::{
    collections::{HashMap, HashSet, hash_map::Entry},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use proxima_core::{Topology, TopologyMap};
use tracing::info;

use crate::{
    errors::EdgeListError,
    parse::{Record, UNKNOWN, parse_line},
};

/// Topology loaded from a line-based edge list.
///
/// # Examples
/// ```
/// use proxima_core::Topology;
/// use proxima_providers_edgelist::EdgeListProvider;
///
/// let text = "a b 3\nb c ?\nd\n";
/// let provider = EdgeListProvider::try_from_reader("lab", text.as_bytes())?;
/// assert_eq!(provider.nodes(), ["a", "b", "c", "d"]);
/// assert_eq!(provider.distance(&"b".to_owned(), &"a".to_owned()), Some(3));
/// assert_eq!(provider.distance(&"b".to_owned(), &"c".to_owned()), None);
/// # Ok::<(), proxima_providers_edgelist::EdgeListError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EdgeListProvider {
    nodes: Vec<String>,
    topology: TopologyMap<String>,
}

impl EdgeListProvider {
    /// Loads an edge list from any reader.
    ///
    /// # Errors
    /// Returns [`EdgeListError`] for unreadable lines, malformed records,
    /// self loops, conflicting repeated edges and inputs without nodes.
    pub fn try_from_reader<R: Read>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, EdgeListError> {
        let mut loader = Loader::new(name.into());
        for (index, text) in BufReader::new(reader).lines().enumerate() {
            let line = index + 1;
            let text = text.map_err(|source| EdgeListError::Read { line, source })?;
            loader.apply(line, &text)?;
        }
        loader.finish()
    }

    /// Loads an edge list from a file.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when the file cannot be opened and the
    /// errors of [`EdgeListProvider::try_from_reader`] otherwise.
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, EdgeListError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, file)
    }

    /// Returns every node in the order it first appeared.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[String] { &self.nodes }

    /// Returns the loaded topology.
    #[must_use]
    #[rustfmt::skip]
    pub fn topology(&self) -> &TopologyMap<String> { &self.topology }

    /// Consumes the provider and returns its topology.
    #[must_use]
    pub fn into_topology(self) -> TopologyMap<String> {
        self.topology
    }
}

impl Topology<String> for EdgeListProvider {
    fn name(&self) -> &str {
        self.topology.name()
    }

    fn distance(&self, left: &String, right: &String) -> Option<u64> {
        self.topology.distance(left, right)
    }
}

/// Distance of a pair and the line that first recorded it.
struct Seen {
    distance: Option<u64>,
    line: usize,
}

struct Loader {
    nodes: Vec<String>,
    known: HashSet<String>,
    pairs: HashMap<(String, String), Seen>,
    topology: TopologyMap<String>,
}

impl Loader {
    fn new(name: String) -> Self {
        Self {
            nodes: Vec::new(),
            known: HashSet::new(),
            pairs: HashMap::new(),
            topology: TopologyMap::new(name),
        }
    }

    fn apply(&mut self, line: usize, text: &str) -> Result<(), EdgeListError> {
        match parse_line(line, text)? {
            None => {}
            Some(Record::Node(node)) => {
                self.declare(node);
                self.topology.add_host(node.to_owned());
            }
            Some(Record::Edge {
                left,
                right,
                distance,
            }) => {
                self.check_repeat(line, left, right, distance)?;
                self.declare(left);
                self.declare(right);
                let (left, right) = (left.to_owned(), right.to_owned());
                match distance {
                    Some(known) => self.topology.insert(left, right, known),
                    None => self.topology.insert_measured(left, right, UNKNOWN),
                }
            }
        }
        Ok(())
    }

    fn declare(&mut self, node: &str) {
        if self.known.insert(node.to_owned()) {
            self.nodes.push(node.to_owned());
        }
    }

    fn check_repeat(
        &mut self,
        line: usize,
        left: &str,
        right: &str,
        distance: Option<u64>,
    ) -> Result<(), EdgeListError> {
        let key = if left < right {
            (left.to_owned(), right.to_owned())
        } else {
            (right.to_owned(), left.to_owned())
        };
        match self.pairs.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Seen { distance, line });
                Ok(())
            }
            Entry::Occupied(seen) if seen.get().distance == distance => Ok(()),
            Entry::Occupied(seen) => Err(EdgeListError::ConflictingEdge {
                line,
                first_line: seen.get().line,
                left: left.to_owned(),
                right: right.to_owned(),
            }),
        }
    }

    fn finish(self) -> Result<EdgeListProvider, EdgeListError> {
        if self.nodes.is_empty() {
            return Err(EdgeListError::Empty);
        }
        info!(
            name = self.topology.name(),
            nodes = self.nodes.len(),
            edges = self.topology.edge_count(),
            "edge list loaded"
        );
        Ok(EdgeListProvider {
            nodes: self.nodes,
            topology: self.topology,
        })
    }
}
