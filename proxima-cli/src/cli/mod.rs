//! Command-line interface for topology-aware node selection.
//!
//! The `select` command loads a topology from an edge list, serves one
//! descriptor-driven request against it and reports the chosen nodes.

mod commands;

pub use commands::{
    Cli, CliError, Command, DescriptorArg, HostArg, OutputFormat, SelectCommand,
    SelectionSummary, render_summary, run_cli,
};
