//! Run configuration: built-in defaults, then `<root>/bandlogos.toml`, then
//! command-line flags.

use crate::core::error::BandLogosError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "bandlogos.toml";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_REGISTRY_URL: &str = "https://musicbrainz.org/ws/2";
pub const DEFAULT_USER_AGENT: &str = "BandLogos/1.0 (https://github.com/bandlogos/BandLogos)";
/// Per-request network timeout. Requests are never retried.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Optional repository-level overrides read from `bandlogos.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub cache_ttl_secs: Option<u64>,
    pub check_mb: Option<bool>,
    pub registry_url: Option<String>,
    pub user_agent: Option<String>,
}

/// Load `bandlogos.toml` from the repository root.
/// No file means no overrides; a malformed file is an error.
pub fn load_file_config(root: &Path) -> Result<FileConfig, BandLogosError> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(FileConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| BandLogosError::ConfigError(format!("{}: {}", path.display(), e)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl RegistrySettings {
    pub fn from_file_config(file: &FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: file
                .registry_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            user_agent: file.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: defaults.timeout,
        }
    }
}

/// Flag values for `validate`, already parsed by clap.
#[derive(Debug, Default, Clone)]
pub struct ValidateOverrides {
    pub only: Option<String>,
    pub paths_file: Option<PathBuf>,
    pub cache_ttl_secs: Option<u64>,
    pub check_mb: bool,
    pub parallel: bool,
}

#[derive(Debug, Clone)]
pub struct ValidateConfig {
    pub root: PathBuf,
    /// Inline `--only` ids, trimmed, empties dropped.
    pub only: Vec<String>,
    pub paths_file: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub check_mb: bool,
    pub parallel: bool,
    pub registry: RegistrySettings,
}

impl ValidateConfig {
    /// Defaults for a repository root: no subset, remote check off.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            only: Vec::new(),
            paths_file: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            check_mb: false,
            parallel: false,
            registry: RegistrySettings::default(),
        }
    }

    pub fn resolve(root: PathBuf, file: &FileConfig, overrides: ValidateOverrides) -> Self {
        Self {
            only: overrides
                .only
                .as_deref()
                .map(parse_id_list)
                .unwrap_or_default(),
            paths_file: overrides.paths_file,
            cache_ttl_secs: overrides
                .cache_ttl_secs
                .or(file.cache_ttl_secs)
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            check_mb: overrides.check_mb || file.check_mb.unwrap_or(false),
            parallel: overrides.parallel,
            registry: RegistrySettings::from_file_config(file),
            root,
        }
    }
}

/// Split a comma-separated id list, trimming whitespace and dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
