//! CLI module for idxsize
//!
//! Provides command-line interface for:
//! - estimate: Resolve a table from a catalog snapshot and estimate
//! - facts: Resolve a table and print its layout facts
//! - compute: Estimate from a JSON input on stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, TargetArgs};
pub use commands::{
    compute, compute_from_value, estimate, facts, load_config, render_estimate, resolve_target, resolve_with, run,
    run_command, run_estimate, snapshot_resolver,
};
pub use config::{Config, OutputFormat};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_error, write_response, write_text};
