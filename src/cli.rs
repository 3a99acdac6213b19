//! CLI struct definitions for the bandlogos command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "bandlogos",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate a BandLogos repository: MBID directory names, logo.png geometry and transparency, metadata.yaml identity, and optional MusicBrainz verification."
)]
pub(crate) struct Cli {
    /// Debug logging on stderr (overridden by BANDLOGOS_LOG).
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Validate artist entries under artists/.
    Validate(ValidateCli),
    /// Search MusicBrainz for candidate artist MBIDs.
    Search(SearchCli),
}

#[derive(clap::Args, Debug)]
pub(crate) struct ValidateCli {
    /// Repository root (defaults to the current working directory).
    #[clap(long)]
    pub root: Option<PathBuf>,
    /// Comma-separated list of MBIDs to validate (limit run to these).
    #[clap(long)]
    pub only: Option<String>,
    /// File containing MBIDs to validate, one per line.
    #[clap(long)]
    pub paths_file: Option<PathBuf>,
    /// Seconds to cache MusicBrainz results (default 86400).
    #[clap(long)]
    pub mb_cache_ttl: Option<u64>,
    /// Verify each MBID exists in MusicBrainz.
    #[clap(long)]
    pub check_mb: bool,
    /// Check entries on a thread pool. Report order is unchanged.
    #[clap(long)]
    pub parallel: bool,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug)]
pub(crate) struct SearchCli {
    /// Artist name to search for.
    #[clap(long)]
    pub name: String,
    /// Max results to return.
    #[clap(long, default_value_t = crate::plugins::search::DEFAULT_SEARCH_LIMIT)]
    pub limit: u32,
    /// Repository root used to find bandlogos.toml.
    #[clap(long)]
    pub root: Option<PathBuf>,
}
