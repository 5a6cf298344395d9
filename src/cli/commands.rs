//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sinkflow CLI
#[derive(Parser, Debug)]
#[command(name = "sinkflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Routing configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route result tables to the configured sinks
    Route {
        /// Result tables as NAME=PATH pairs (Parquet files)
        #[arg(short, long = "input", value_name = "NAME=PATH")]
        inputs: Vec<String>,

        /// Plan text files as NAME=PATH pairs, attached to the matching input
        #[arg(short, long = "plan", value_name = "NAME=PATH")]
        plans: Vec<String>,
    },

    /// Parse a plan text file and print the lineage report
    Lineage {
        /// Plan text file
        plan_file: PathBuf,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a routing configuration
    Validate,

    /// Print the resolved job context
    Context {
        /// Engine session id used for platform detection (overrides the
        /// configured platform)
        #[arg(long)]
        session_id: Option<String>,
    },
}
