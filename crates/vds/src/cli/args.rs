//! Clap argument definitions for the `vds` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vds_geo::RegionCategory;

/// Parse a region category from a string.
fn parse_category(s: &str) -> Result<RegionCategory, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "vds", version)]
#[command(about = "Compile, hash and validate versioned query documents")]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Read configuration from this file instead of discovering .vds.toml files
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Query schema version [default: from config, else the newest]
    #[arg(long = "version-schema", global = true, value_name = "VERSION")]
    pub schema_version: Option<String>,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where to read a query document from.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryInput {
    /// Query document file; reads stdin when omitted
    pub file: Option<PathBuf>,
}

/// Arguments for `vds translate`.
#[derive(Args, Debug, Clone)]
pub struct TranslateCommand {
    #[command(flatten)]
    /// Query source.
    pub input: QueryInput,

    /// Print the query tree instead of the search-engine JSON
    #[arg(long)]
    pub tree: bool,

    /// Print JSON on a single line
    #[arg(long, conflicts_with = "tree")]
    pub compact: bool,
}

/// Arguments for `vds hash`.
#[derive(Args, Debug, Clone)]
pub struct HashCommand {
    #[command(flatten)]
    /// Query source.
    pub input: QueryInput,

    /// Print the canonical strings that are hashed instead of the hash
    #[arg(long)]
    pub canonical: bool,
}

/// Arguments for `vds regions`.
#[derive(Args, Debug, Clone)]
pub struct RegionsCommand {
    /// List the area names of one category (country, marine, geography)
    #[arg(value_parser = parse_category)]
    pub category: Option<RegionCategory>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `vds` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a query document into a search-engine query
    Translate(TranslateCommand),

    /// Compute the cache key of a query document
    Hash(HashCommand),

    /// Check that a query document is well formed and its named areas exist
    Validate(QueryInput),

    /// List the named areas available to geo_named_area filters
    Regions(RegionsCommand),

    /// Show the effective configuration
    Config,
}
