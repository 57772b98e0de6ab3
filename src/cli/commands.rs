//! CLI commands and argument parsing

use crate::types::Id;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Moloni API
#[derive(Parser, Debug)]
#[command(name = "moloni")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); `MOLONI_*` variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain an access token and show when it expires
    Token,

    /// List the endpoints this client binds
    Endpoints {
        /// Only endpoints of this resource
        #[arg(short, long)]
        resource: Option<String>,
    },

    /// List the companies the account can access
    Companies,

    /// Call any bound endpoint with raw JSON parameters
    Call {
        /// Resource name, e.g. `customers`
        resource: String,

        /// Action name, e.g. `getAll`
        action: String,

        /// Parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Company to act on when the parameters omit `company_id`
        #[arg(long)]
        company_id: Option<Id>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
