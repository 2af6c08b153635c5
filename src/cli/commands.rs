//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the HTTP item server (default)
//! - inspect: summarize a snapshot file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, ServerConfig};

/// tickstore - a tick-versioned item store for incremental sync
#[derive(Parser, Debug)]
#[command(name = "tickstore")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server options used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The command to run; a bare invocation serves with the top-level options.
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(self.serve.clone()))
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Print a summary of a snapshot file
    Inspect {
        /// Snapshot file (defaults to the configured path)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },
}

/// Options for `serve`; each overrides the matching config value
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Snapshot file to load at start and save at shutdown
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,
}

impl ServeArgs {
    /// Layer these arguments over the loaded config.
    pub fn resolve(&self, config: &Config) -> (ServerConfig, PathBuf) {
        let mut server = config.server.clone();
        if let Some(bind) = &self.bind {
            server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        let snapshot = self
            .snapshot
            .clone()
            .unwrap_or_else(|| config.storage.snapshot_path.clone());
        (server, snapshot)
    }
}
