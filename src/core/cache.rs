//! On-disk cache of MusicBrainz verification results.
//!
//! The cache is an optimization layer only. A missing or corrupt file is an
//! empty cache, and the whole map is replaced on save (temp file + rename).

use crate::core::error::BandLogosError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = ".mb_cache.json";

/// Last-known registry answer for one MBID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch seconds of the lookup.
    #[serde(default)]
    pub ts: i64,
    /// Registry confirmed the id.
    #[serde(default)]
    pub ok: bool,
    /// Display name returned by the registry.
    #[serde(default)]
    pub name: Option<String>,
}

impl CacheEntry {
    pub fn confirmed(ts: i64, name: Option<String>) -> Self {
        Self { ts, ok: true, name }
    }

    pub fn denied(ts: i64) -> Self {
        Self {
            ts,
            ok: false,
            name: None,
        }
    }

    /// `now - ts <= ttl`.
    pub fn is_fresh(&self, now: i64, ttl_secs: u64) -> bool {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        now.saturating_sub(self.ts) <= ttl
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

pub fn cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_FILE_NAME)
}

impl CacheStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache for a repository root. Never fails.
    pub fn load(root: &Path) -> Self {
        let path = cache_path(root);
        let entries = match fs::read_to_string(&path) {
            Ok(content) => parse_entries(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable cache {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("ignoring unreadable cache {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        log::debug!("cache: loaded {} record(s) from {}", entries.len(), path.display());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, mbid: &str) -> Option<&CacheEntry> {
        self.entries.get(mbid)
    }

    /// Cached record for `mbid` if it is still inside the TTL window.
    pub fn lookup_fresh(&self, mbid: &str, now: i64, ttl_secs: u64) -> Option<&CacheEntry> {
        self.entries.get(mbid).filter(|e| e.is_fresh(now, ttl_secs))
    }

    pub fn record(&mut self, mbid: &str, entry: CacheEntry) {
        self.entries.insert(mbid.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the on-disk file with the current map.
    pub fn save(&self) -> Result<(), BandLogosError> {
        let body = serde_json::to_string(&self.entries)?;
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BandLogosError::PathError(self.path.display().to_string()))?;
        let tmp = self.path.with_file_name(format!("{}.tmp", file_name));
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("cache: wrote {} record(s) to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

/// Parse the cache document. Records that do not fit [`CacheEntry`] are
/// dropped individually; only a non-object document fails as a whole.
fn parse_entries(content: &str) -> Result<BTreeMap<String, CacheEntry>, serde_json::Error> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;
    Ok(raw
        .into_iter()
        .filter_map(|(mbid, value)| match serde_json::from_value::<CacheEntry>(value) {
            Ok(entry) => Some((mbid, entry)),
            Err(e) => {
                log::debug!("cache: dropping malformed record {}: {}", mbid, e);
                None
            }
        })
        .collect())
}
