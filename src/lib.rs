//! BandLogos: repository checker for per-artist band logos.
//!
//! A BandLogos repository keeps one directory per artist under `artists/`,
//! named by the artist's MusicBrainz Identifier (MBID):
//!
//! ```text
//! artists/
//!   65f4f0c5-ef9e-490c-aee3-909e7ae6b2ab/
//!     logo.png
//!     metadata.yaml
//! ```
//!
//! `bandlogos validate` checks every entry and exits `0` when clean, `2`
//! when any problem is found:
//!
//! - the directory name is a canonical UUID
//! - `logo.png` is square, 1024-2048 px wide, has an alpha channel and at
//!   least one non-opaque pixel
//! - `metadata.yaml` parses and its `mbid` (if any) matches the directory
//! - with `--check-mb`, MusicBrainz knows the MBID; results are cached in
//!   `.mb_cache.json` for `--mb-cache-ttl` seconds
//!
//! `bandlogos search --name <artist>` lists candidate MBIDs.
//!
//! # Crate Structure
//!
//! - [`core`]: checks, cache, registry client, report rendering
//! - [`plugins`]: helpers outside the validation pipeline (artist search)

mod cli;
pub mod core;
pub mod plugins;

use crate::core::capabilities::Capabilities;
use crate::core::config::{self, RegistrySettings, ValidateConfig, ValidateOverrides};
use crate::core::error::BandLogosError;
use crate::core::output;
use crate::core::registry::{IdentityRegistry, MusicBrainzClient};
use crate::core::validate;
use clap::Parser;
use cli::{Cli, Command, SearchCli, ValidateCli};
use std::path::PathBuf;

pub use crate::core::error;

const LOG_ENV: &str = "BANDLOGOS_LOG";

fn init_logging(verbose: bool) {
    let mut builder = colog::default_builder();
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    builder.filter(None, level);
    if let Ok(filters) = std::env::var(LOG_ENV) {
        builder.parse_filters(&filters);
    }
    // A logger may already be installed when embedded; keep it.
    let _ = builder.try_init();
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf, BandLogosError> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

pub fn run() -> Result<(), BandLogosError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Search(args) => run_search(args),
    }
}

fn run_validate(args: ValidateCli) -> Result<(), BandLogosError> {
    let as_json = match args.format.as_str() {
        "text" => false,
        "json" => true,
        other => {
            return Err(BandLogosError::ConfigError(format!(
                "unknown --format '{}', expected 'text' or 'json'",
                other
            )));
        }
    };

    let root = resolve_root(args.root)?;
    let file_config = config::load_file_config(&root)?;
    let validate_config = ValidateConfig::resolve(
        root,
        &file_config,
        ValidateOverrides {
            only: args.only,
            paths_file: args.paths_file,
            cache_ttl_secs: args.mb_cache_ttl,
            check_mb: args.check_mb,
            parallel: args.parallel,
        },
    );

    let capabilities = Capabilities::detect();
    let client = validate_config
        .check_mb
        .then(|| MusicBrainzClient::new(validate_config.registry.clone()));
    let registry = client.as_ref().map(|c| c as &dyn IdentityRegistry);

    let report = validate::run_validation(&validate_config, capabilities, registry)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output::render_json(&report))?);
    } else {
        print!("{}", output::render_text(&report, true));
    }

    if report.passed() {
        Ok(())
    } else {
        Err(BandLogosError::ValidationError(format!(
            "{} issue(s) found.",
            report.findings.error_count()
        )))
    }
}

fn run_search(args: SearchCli) -> Result<(), BandLogosError> {
    let root = resolve_root(args.root)?;
    let file_config = config::load_file_config(&root)?;
    let client = MusicBrainzClient::new(RegistrySettings::from_file_config(&file_config));
    plugins::search::run_search(&client, &args.name, args.limit);
    Ok(())
}
