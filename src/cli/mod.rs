//! CLI module for catalogdb
//!
//! Provides command-line interface for:
//! - init: Write config and create the snapshot
//! - start: Boot and serve JSON requests from stdin
//! - analytics: Print (optionally refreshed) analytics
//! - audit: Print recent audit entries
//! - search: One-shot substring search

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{analytics, audit, init, run, run_command, search, start};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_json, write_response};
