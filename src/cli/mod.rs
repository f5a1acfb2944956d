//! CLI module for Codemap.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Codemap - learning roadmaps from a team of search-backed agents
///
/// Serves `GET /roadmap/{topic}` or builds a single roadmap from the terminal.
#[derive(Parser, Debug)]
#[command(name = "codemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default: server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a roadmap for a topic and print it
    Roadmap {
        /// The topic to learn, e.g. "rust async"
        topic: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Probe resource links and drop broken ones
        #[arg(long)]
        check_links: bool,

        /// Print the raw JSON body instead of a formatted roadmap
        #[arg(long)]
        json: bool,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
