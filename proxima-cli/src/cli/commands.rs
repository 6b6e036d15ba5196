//! Command implementations and argument parsing for the proxima CLI.

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use proxima_core::{
    HostLayout, Linkage, NodeSelector, PivotCounting, Selection, SelectionError,
    SelectionErrorCode, Topology, TopologyDescriptor,
};
use proxima_providers_edgelist::{EdgeListError, EdgeListProvider};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "proxima", about = "Select groups of nodes that sit close together.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns the output format requested by the command.
    #[must_use]
    pub fn output(&self) -> OutputFormat {
        match &self.command {
            Command::Select(select) => select.output,
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve one node request against an edge-list topology.
    Select(SelectCommand),
}

/// Options accepted by the `select` command.
#[derive(Debug, Args, Clone)]
pub struct SelectCommand {
    /// Path to the edge list describing the topology.
    pub path: PathBuf,

    /// Number of nodes requested.
    #[arg(long, short = 'n')]
    pub count: usize,

    /// Placement constraint for the request.
    #[arg(long, value_enum, default_value_t = DescriptorArg::BestProximity)]
    pub descriptor: DescriptorArg,

    /// Inclusive cap on a single merge's cost for `threshold-proximity`.
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Linkage used to cost merges (`avg`, `min` or `max`). Defaults to
    /// `avg`.
    #[arg(long)]
    pub linkage: Option<Linkage>,

    /// Node the selection must be grown around; repeat for several.
    #[arg(long = "pivot", value_name = "NODE")]
    pub pivot: Vec<String>,

    /// Node eligible for selection; repeat for several. Defaults to every
    /// node of the topology in file order.
    #[arg(long = "candidate", value_name = "NODE")]
    pub candidates: Vec<String>,

    /// Host and the nodes it runs, as `HOST=NODE[,NODE...]`; repeat for
    /// several hosts. Required by the host-based descriptors.
    #[arg(long = "host", value_name = "HOST=NODES", value_parser = parse_host_arg)]
    pub hosts: Vec<HostArg>,

    /// Count the requested number in addition to the pivot members.
    #[arg(long)]
    pub exclude_pivot: bool,

    /// Override name for the topology (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Descriptor names accepted on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum DescriptorArg {
    /// Any matched nodes; topology is ignored.
    Arbitrary,
    /// The closest group of nodes.
    BestProximity,
    /// The closest group of nodes within `--threshold`.
    ThresholdProximity,
    /// Candidates sharing one host.
    SingleHost,
    /// One entirely free host.
    SingleHostExclusive,
    /// As few entirely free hosts as possible.
    MultipleHostsExclusive,
    /// One node on each of several entirely free hosts.
    DifferentHostsExclusive,
}

/// One `--host` assignment.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HostArg {
    /// Host name.
    pub host: String,
    /// Nodes running on the host, in the order given.
    pub nodes: Vec<String>,
}

pub(super) fn parse_host_arg(raw: &str) -> Result<HostArg, String> {
    let Some((host, nodes)) = raw.split_once('=') else {
        return Err(format!("expected HOST=NODE[,NODE...], got `{raw}`"));
    };
    let host = host.trim();
    if host.is_empty() {
        return Err(format!("missing host name in `{raw}`"));
    }
    let nodes: Vec<String> = nodes
        .split(',')
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if nodes.is_empty() {
        return Err(format!("host `{host}` lists no nodes"));
    }
    Ok(HostArg {
        host: host.to_owned(),
        nodes,
    })
}

/// Output formats for the selection summary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One node per line after a short header.
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The edge list could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A node named on the command line is not part of the topology.
    #[error("{role} `{node}` is not part of topology `{topology}`")]
    UnknownNode {
        /// Whether the node was given as a pivot, a candidate or a host
        /// member.
        role: &'static str,
        /// Offending node name.
        node: String,
        /// Topology that was searched.
        topology: String,
    },
    /// `threshold-proximity` was requested without `--threshold`.
    #[error("`--descriptor threshold-proximity` requires `--threshold`")]
    MissingThreshold,
    /// A host-based descriptor was requested without any `--host`.
    #[error("`--descriptor {descriptor}` requires at least one `--host`")]
    MissingHosts {
        /// Stable name of the requested descriptor.
        descriptor: &'static str,
    },
    /// Edge-list loading failed.
    #[error(transparent)]
    EdgeList(#[from] EdgeListError),
    /// The selection request was rejected.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl CliError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "PROXIMA_CLI_IO",
            Self::UnknownNode { .. } => "PROXIMA_CLI_UNKNOWN_NODE",
            Self::MissingThreshold => "PROXIMA_CLI_MISSING_THRESHOLD",
            Self::MissingHosts { .. } => "PROXIMA_CLI_MISSING_HOSTS",
            Self::EdgeList(err) => err.code(),
            Self::Selection(err) => err.code().as_str(),
        }
    }

    /// Returns the core selection code when the request itself was rejected.
    #[must_use]
    pub fn selection_code(&self) -> Option<SelectionErrorCode> {
        match self {
            Self::Selection(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// Outcome of a `select` command, ready for rendering.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SelectionSummary {
    /// Name of the topology the request was served against.
    pub topology: String,
    /// Stable name of the descriptor kind.
    pub descriptor: String,
    /// Number of nodes requested on the command line.
    pub requested: usize,
    /// Most nodes the request could return.
    pub wanted: usize,
    /// Whether `wanted` nodes were selected.
    pub satisfied: bool,
    /// Why the selection stopped.
    pub termination: String,
    /// Number of merges performed by the clustering engine.
    pub merges: usize,
    /// Selected nodes in selection order.
    pub nodes: Vec<String>,
    /// Unrequested nodes of exclusively reserved hosts.
    pub extra: Vec<String>,
}

impl SelectionSummary {
    fn new(
        topology: &str,
        descriptor: &TopologyDescriptor<String>,
        requested: usize,
        selection: Selection<String>,
    ) -> Self {
        Self {
            topology: topology.to_owned(),
            descriptor: descriptor.kind().to_string(),
            requested,
            wanted: selection.wanted(),
            satisfied: selection.is_satisfied(),
            termination: selection.termination().to_string(),
            merges: selection.merges(),
            extra: selection.extra_nodes().to_vec(),
            nodes: selection.into_nodes(),
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the topology or serving the request
/// fails. An undersized selection is reported through the summary instead.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use proxima_cli::cli::{Cli, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "a b 2\na c 4\nb c 10\n")?;
/// let path = file.path().to_str().ok_or("non-utf8 temp path")?;
/// let cli = Cli::try_parse_from(["proxima", "select", path, "--count", "2"])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.nodes, ["a", "b"]);
/// assert!(summary.satisfied);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<SelectionSummary, CliError> {
    match cli.command {
        Command::Select(select) => {
            Span::current().record("command", field::display("select"));
            run_select(select)
        }
    }
}

#[instrument(
    name = "cli.select",
    err,
    skip(command),
    fields(
        path = %command.path.display(),
        count = command.count,
        descriptor = field::Empty,
        topology = field::Empty,
    ),
)]
pub(super) fn run_select(command: SelectCommand) -> Result<SelectionSummary, CliError> {
    let name = derive_topology_name(&command.path, command.name.as_deref());
    let provider = EdgeListProvider::try_from_reader(name, open_edge_list(&command.path)?)?;
    let descriptor = build_descriptor(&command)?;

    let span = Span::current();
    span.record("descriptor", field::display(descriptor.kind()));
    span.record("topology", field::display(provider.name()));

    let candidates = resolve_nodes(&provider, &command.candidates, "candidate")?;
    resolve_nodes(&provider, &command.pivot, "pivot")?;
    let layout = build_host_layout(&provider, &command.hosts)?;
    let counting = if command.exclude_pivot {
        PivotCounting::ExcludesPivot
    } else {
        PivotCounting::IncludesPivot
    };
    let selector = NodeSelector::default().with_pivot_counting(counting);
    let selection = if descriptor.is_host_based() {
        if layout.is_empty() {
            return Err(CliError::MissingHosts {
                descriptor: descriptor.kind().as_str(),
            });
        }
        selector.select_with_hosts(&descriptor, command.count, candidates, &provider, &layout)?
    } else {
        if !layout.is_empty() {
            warn!(descriptor = %descriptor.kind(), "ignoring --host");
        }
        selector.select(&descriptor, command.count, candidates, &provider)?
    };

    let summary = SelectionSummary::new(provider.name(), &descriptor, command.count, selection);
    info!(
        topology = summary.topology.as_str(),
        selected = summary.nodes.len(),
        satisfied = summary.satisfied,
        "command completed"
    );
    Ok(summary)
}

pub(super) fn build_descriptor(
    command: &SelectCommand,
) -> Result<TopologyDescriptor<String>, CliError> {
    let descriptor = match command.descriptor {
        DescriptorArg::Arbitrary => TopologyDescriptor::Arbitrary,
        DescriptorArg::BestProximity => TopologyDescriptor::best_proximity(),
        DescriptorArg::ThresholdProximity => {
            let threshold = command.threshold.ok_or(CliError::MissingThreshold)?;
            TopologyDescriptor::threshold_proximity(threshold)
        }
        DescriptorArg::SingleHost => TopologyDescriptor::SingleHost,
        DescriptorArg::SingleHostExclusive => TopologyDescriptor::SingleHostExclusive,
        DescriptorArg::MultipleHostsExclusive => TopologyDescriptor::MultipleHostsExclusive,
        DescriptorArg::DifferentHostsExclusive => TopologyDescriptor::DifferentHostsExclusive,
    };
    if command.threshold.is_some() && command.descriptor != DescriptorArg::ThresholdProximity {
        warn!(descriptor = %descriptor.kind(), "ignoring --threshold");
    }
    if !command.pivot.is_empty() && !descriptor.is_distance_based() {
        warn!(descriptor = %descriptor.kind(), "ignoring --pivot");
    }
    if command.linkage.is_some() && !descriptor.is_distance_based() {
        warn!(descriptor = %descriptor.kind(), "ignoring --linkage");
    }
    let descriptor = descriptor.with_linkage(command.linkage.unwrap_or_default());
    Ok(if command.pivot.is_empty() {
        descriptor
    } else {
        descriptor.with_pivot(command.pivot.clone())
    })
}

/// Returns `requested` when every entry is a known node, or every node of
/// the topology when `requested` is empty.
pub(super) fn resolve_nodes<'a>(
    provider: &'a EdgeListProvider,
    requested: &'a [String],
    role: &'static str,
) -> Result<&'a [String], CliError> {
    if requested.is_empty() {
        return Ok(provider.nodes());
    }
    let known: HashSet<&str> = provider.nodes().iter().map(String::as_str).collect();
    match requested.iter().find(|node| !known.contains(node.as_str())) {
        Some(node) => Err(CliError::UnknownNode {
            role,
            node: node.clone(),
            topology: provider.name().to_owned(),
        }),
        None => Ok(requested),
    }
}

/// Groups the `--host` assignments into a layout after checking every
/// member against the topology.
pub(super) fn build_host_layout(
    provider: &EdgeListProvider,
    hosts: &[HostArg],
) -> Result<HostLayout<String, String>, CliError> {
    let known: HashSet<&str> = provider.nodes().iter().map(String::as_str).collect();
    let mut layout = HostLayout::new();
    for assignment in hosts {
        for node in &assignment.nodes {
            if !known.contains(node.as_str()) {
                return Err(CliError::UnknownNode {
                    role: "host member",
                    node: node.clone(),
                    topology: provider.name().to_owned(),
                });
            }
            if !layout.add_node(assignment.host.clone(), node.clone()) {
                warn!(
                    node = node.as_str(),
                    host = assignment.host.as_str(),
                    "node already placed on another host"
                );
            }
        }
    }
    Ok(layout)
}

#[instrument(name = "cli.open_edge_list", err, fields(path = %path.display()))]
pub(super) fn open_edge_list(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_topology_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "topology".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in the requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use proxima_cli::cli::{OutputFormat, SelectionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = SelectionSummary {
///     topology: "lab".into(),
///     descriptor: "best-proximity".into(),
///     requested: 2,
///     wanted: 2,
///     satisfied: true,
///     termination: "target_reached".into(),
///     merges: 1,
///     nodes: vec!["a".into(), "b".into()],
///     extra: Vec::new(),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, OutputFormat::Text, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("a\nb\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(
    summary: &SelectionSummary,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)
        }
        OutputFormat::Text => {
            writeln!(writer, "topology: {}", summary.topology)?;
            writeln!(writer, "descriptor: {}", summary.descriptor)?;
            writeln!(
                writer,
                "selected: {} of {} ({})",
                summary.nodes.len(),
                summary.wanted,
                summary.termination
            )?;
            if !summary.extra.is_empty() {
                writeln!(writer, "extra: {}", summary.extra.join(" "))?;
            }
            for node in &summary.nodes {
                writeln!(writer, "{node}")?;
            }
            Ok(())
        }
    }
}
