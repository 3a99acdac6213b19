//! Repository validation harness.
//!
//! Walks `artists/<mbid>/` entries in sorted order and runs the fixed check
//! set against each one:
//!
//! - MBID format of the directory name
//! - `logo.png` presence, geometry and transparency
//! - `metadata.yaml` presence and `mbid` cross-check
//! - optional MusicBrainz verification (cached)
//!
//! Nothing short-circuits: every entry is checked and every problem is
//! returned in one [`ValidationReport`]. A missing `artists/` directory is a
//! vacuous pass; one that exists but cannot be read or listed aborts the run.

use crate::core::cache::CacheStore;
use crate::core::capabilities::{Capabilities, ParseCapability};
use crate::core::config::ValidateConfig;
use crate::core::error::BandLogosError;
use crate::core::finding::{FindingKind, Findings};
use crate::core::mbid;
use crate::core::registry::{self, IdentityRegistry};
use crate::core::time;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub const ARTISTS_DIR_NAME: &str = "artists";
pub const LOGO_FILE_NAME: &str = "logo.png";
pub const METADATA_FILE_NAME: &str = "metadata.yaml";
pub const EXIT_VALIDATION_FAILED: i32 = 2;

/// Entry id used for findings about the `--paths-file` itself.
const PATHS_FILE_ENTRY: &str = "paths-file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Findings,
    pub entries_checked: usize,
    /// False when the repository has no `artists/` directory yet.
    pub artists_dir_present: bool,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        !self.findings.has_errors()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            EXIT_VALIDATION_FAILED
        }
    }
}

/// Per-run inputs shared by every entry check.
struct EntryContext<'a> {
    artists_dir: &'a Path,
    capabilities: Capabilities,
    registry: Option<&'a dyn IdentityRegistry>,
    cache: &'a Mutex<CacheStore>,
    ttl_secs: u64,
    now: i64,
}

fn trace_gate(name: &str) {
    log::trace!("validate: gate {}", name);
}

/// Run the full check set.
///
/// `registry` enables the remote check; pass `None` to keep the run offline.
/// The cache file is rewritten at the end of every run that gets as far as
/// checking entries, pass or fail.
pub fn run_validation(
    config: &ValidateConfig,
    capabilities: Capabilities,
    registry: Option<&dyn IdentityRegistry>,
) -> Result<ValidationReport, BandLogosError> {
    let artists_dir = config.root.join(ARTISTS_DIR_NAME);
    match fs::metadata(&artists_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(BandLogosError::PathError(format!(
                "{} is not a directory",
                artists_dir.display()
            )));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("validate: no {} directory under {}", ARTISTS_DIR_NAME, config.root.display());
            return Ok(ValidationReport {
                findings: Findings::new(),
                entries_checked: 0,
                artists_dir_present: false,
            });
        }
        Err(e) => return Err(BandLogosError::IoError(e)),
    }

    for missing in capabilities.missing() {
        log::warn!(
            "validate: {} support not compiled in; affected files will be reported",
            missing.as_str()
        );
    }

    let mut findings = Findings::new();

    trace_gate("resolve_selection");
    let selection = resolve_selection(&config.only, config.paths_file.as_deref(), &mut findings);

    let names: Vec<String> = if selection.is_empty() {
        list_entry_dirs(&artists_dir)?
    } else {
        let present = |id: &String| is_entry_name(id) && artists_dir.join(id).is_dir();
        for id in &selection {
            if !present(id) {
                findings.error(
                    FindingKind::Structural,
                    id,
                    "specified in --only/--paths-file but artist directory not found",
                );
            }
        }
        selection
            .into_iter()
            .filter(|id| present(id))
            .collect()
    };

    let cache = Mutex::new(CacheStore::load(&config.root));
    let ctx = EntryContext {
        artists_dir: &artists_dir,
        capabilities,
        registry,
        cache: &cache,
        ttl_secs: config.cache_ttl_secs,
        now: time::now_epoch_secs(),
    };

    trace_gate("check_entries");
    let per_entry: Vec<Findings> = if config.parallel {
        names.par_iter().map(|id| check_entry(&ctx, id)).collect()
    } else {
        names.iter().map(|id| check_entry(&ctx, id)).collect()
    };
    findings.extend(per_entry.into_iter().collect());

    trace_gate("persist_cache");
    let cache = cache.into_inner().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = cache.save() {
        log::warn!("validate: could not write {}: {}", cache.path().display(), e);
    }

    log::debug!(
        "validate: summary entries={} errors={} infos={}",
        names.len(),
        findings.error_count(),
        findings.info_count()
    );

    Ok(ValidationReport {
        findings,
        entries_checked: names.len(),
        artists_dir_present: true,
    })
}

/// Union of the inline ids and the ids listed in `paths_file`.
///
/// An unreadable paths file is recorded as a finding and contributes nothing.
pub fn resolve_selection(
    only: &[String],
    paths_file: Option<&Path>,
    findings: &mut Findings,
) -> BTreeSet<String> {
    let mut selection: BTreeSet<String> = only
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(path) = paths_file {
        match fs::read_to_string(path) {
            Ok(content) => selection.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            ),
            Err(e) => findings.error(
                FindingKind::Input,
                PATHS_FILE_ENTRY,
                format!("cannot read file {} - {}", path.display(), e),
            ),
        }
    }
    selection
}

/// True when `id` names a single directory directly under `artists/`.
fn is_entry_name(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !id.contains(['/', '\\'])
}

/// Sorted names of the subdirectories of `artists/`. Plain files are ignored.
pub fn list_entry_dirs(artists_dir: &Path) -> Result<Vec<String>, BandLogosError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(artists_dir).map_err(BandLogosError::IoError)? {
        let entry = entry.map_err(BandLogosError::IoError)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn check_entry(ctx: &EntryContext<'_>, id: &str) -> Findings {
    log::debug!("validate: entry {}", id);
    let mut findings = Findings::new();
    let dir: PathBuf = ctx.artists_dir.join(id);

    let well_formed = mbid::is_mbid(id);
    if !well_formed {
        findings.error(
            FindingKind::Structural,
            id,
            "directory name is not a valid MBID (UUID)",
        );
    }

    let logo_path = dir.join(LOGO_FILE_NAME);
    if logo_path.is_file() {
        findings.extend(check_logo_file(ctx.capabilities, &logo_path, id));
    } else {
        findings.error(
            FindingKind::Structural,
            id,
            format!("missing required file {}", LOGO_FILE_NAME),
        );
    }

    let metadata_path = dir.join(METADATA_FILE_NAME);
    if metadata_path.is_file() {
        findings.extend(check_metadata_file(ctx.capabilities, &metadata_path, id));
    } else {
        findings.error(
            FindingKind::Structural,
            id,
            format!("missing {}", METADATA_FILE_NAME),
        );
    }

    if let Some(registry) = ctx.registry {
        if well_formed {
            findings.extend(registry::verify_identity(
                registry,
                ctx.cache,
                id,
                ctx.ttl_secs,
                ctx.now,
            ));
        }
    }

    findings
}

#[cfg_attr(not(feature = "png"), allow(unused_variables))]
fn check_logo_file(capabilities: Capabilities, path: &Path, id: &str) -> Findings {
    if capabilities.has(ParseCapability::ImageDecoding) {
        #[cfg(feature = "png")]
        return crate::core::logo::check_logo(path, id);
    }
    dependency_missing(ParseCapability::ImageDecoding, id)
}

#[cfg_attr(not(feature = "yaml"), allow(unused_variables))]
fn check_metadata_file(capabilities: Capabilities, path: &Path, id: &str) -> Findings {
    if capabilities.has(ParseCapability::Yaml) {
        #[cfg(feature = "yaml")]
        return crate::core::metadata::check_metadata(path, id);
    }
    dependency_missing(ParseCapability::Yaml, id)
}

fn dependency_missing(capability: ParseCapability, id: &str) -> Findings {
    let mut findings = Findings::new();
    findings.error(FindingKind::DependencyMissing, id, capability.missing_message());
    findings
}
