//! CLI argument definitions using clap
//!
//! Commands:
//! - idxsize estimate --config <path> --database <db> --table <t> --columns <a,b>
//! - idxsize facts --config <path> --database <db> --table <t> --columns <a,b>
//! - idxsize compute

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::config::OutputFormat;

/// idxsize - Estimate nonclustered index size from catalog metadata
#[derive(Parser, Debug)]
#[command(name = "idxsize")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Identity of the index to estimate
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Instance name; must match the catalog snapshot when given
    #[arg(long)]
    pub instance: Option<String>,

    /// Database containing the table
    #[arg(long)]
    pub database: String,

    /// Schema containing the table
    #[arg(long, default_value = "dbo")]
    pub schema: String,

    /// Table the index will be built on
    #[arg(long)]
    pub table: String,

    /// Comma-separated index key columns, in key order
    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the table from the catalog and estimate the index size
    Estimate {
        /// Path to configuration file
        #[arg(long, default_value = "./idxsize.json")]
        config: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        /// Row count to estimate for instead of the table's current count
        #[arg(long)]
        row_count: Option<u64>,

        /// Fill factor percentage (1-100); overrides the config file
        #[arg(long)]
        fill_factor: Option<u32>,

        /// Output format; overrides the config file
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Resolve the table from the catalog and print the layout facts
    Facts {
        /// Path to configuration file
        #[arg(long, default_value = "./idxsize.json")]
        config: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Read an estimation input as JSON from stdin and estimate
    Compute {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
