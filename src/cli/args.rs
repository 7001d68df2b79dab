//! CLI argument definitions using clap
//!
//! Commands:
//! - catalogdb init --config <path>
//! - catalogdb start --config <path>
//! - catalogdb analytics --config <path> [--refresh]
//! - catalogdb audit --config <path> [--limit <n>]
//! - catalogdb search --config <path> --query <text> [--scope users|items|all]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::service::SearchScope;

/// catalogdb - an embedded, snapshot-backed catalog record store
#[derive(Parser, Debug)]
#[command(name = "catalogdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config (if absent), create the snapshot and seed the admin account
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,
    },

    /// Open the store and serve JSON requests from stdin, one per line
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,
    },

    /// Print the cached analytics
    Analytics {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        /// Recompute before printing
        #[arg(long)]
        refresh: bool,
    },

    /// Print the most recent audit log entries
    Audit {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        /// Number of entries (non-positive means the default of 50)
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Case-insensitive substring search over users and items
    Search {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        /// Text to look for
        #[arg(long, short)]
        query: String,

        /// Collections to search: users, items or all
        #[arg(long, default_value = "all")]
        scope: SearchScope,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
