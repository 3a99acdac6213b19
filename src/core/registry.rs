//! Remote identity verification against MusicBrainz, fronted by the
//! [`CacheStore`].
//!
//! Only conclusive answers (confirmed, not found) are cached. A transport
//! failure or an unexpected response is reported for this run and leaves
//! the cache untouched, so an outage never marks a real MBID as unknown
//! for a whole TTL window.

use crate::core::cache::{CacheEntry, CacheStore};
use crate::core::config::RegistrySettings;
use crate::core::finding::{FindingKind, Findings};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Result of one live lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Confirmed { name: Option<String> },
    NotFound,
    Unreachable(String),
}

/// Lookup-by-id seam; the live implementation is [`MusicBrainzClient`].
pub trait IdentityRegistry: Send + Sync {
    fn lookup_artist(&self, mbid: &str) -> LookupOutcome;
}

#[derive(Debug)]
pub(crate) enum HttpFailure {
    Status(u16),
    Transport(String),
    Body(String),
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpFailure::Status(code) => write!(f, "unexpected HTTP status {}", code),
            HttpFailure::Transport(msg) => write!(f, "request failed: {}", msg),
            HttpFailure::Body(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

/// Blocking MusicBrainz web-service client. One attempt per request.
pub struct MusicBrainzClient {
    agent: ureq::Agent,
    settings: RegistrySettings,
}

impl MusicBrainzClient {
    pub fn new(settings: RegistrySettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.timeout)
            .build();
        Self { agent, settings }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn artist_url(&self, mbid: &str) -> String {
        format!("{}/artist/{}?fmt=json", self.settings.base_url, mbid)
    }

    pub(crate) fn get_json(&self, url: &str) -> Result<JsonValue, HttpFailure> {
        log::debug!("registry: GET {}", url);
        let response = self
            .agent
            .get(url)
            .set("User-Agent", &self.settings.user_agent)
            .set("Accept", "application/json")
            .call()
            .map_err(|error| match error {
                ureq::Error::Status(code, _) => HttpFailure::Status(code),
                ureq::Error::Transport(transport) => HttpFailure::Transport(transport.to_string()),
            })?;
        let body = response
            .into_string()
            .map_err(|e| HttpFailure::Body(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| HttpFailure::Body(e.to_string()))
    }
}

impl IdentityRegistry for MusicBrainzClient {
    fn lookup_artist(&self, mbid: &str) -> LookupOutcome {
        match self.get_json(&self.artist_url(mbid)) {
            Ok(body) => interpret_artist(mbid, &body),
            Err(HttpFailure::Status(404)) => LookupOutcome::NotFound,
            Err(other) => LookupOutcome::Unreachable(other.to_string()),
        }
    }
}

/// Decide a 200 response: the echoed id must be the one requested.
pub fn interpret_artist(mbid: &str, body: &JsonValue) -> LookupOutcome {
    if body.get("id").and_then(JsonValue::as_str) != Some(mbid) {
        return LookupOutcome::Unreachable(format!(
            "invalid response: artist id does not echo {}",
            mbid
        ));
    }
    let name = ["name", "sort-name"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(JsonValue::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string);
    LookupOutcome::Confirmed { name }
}

/// Cache-first verification of one well-formed MBID.
///
/// The cache lock is not held across the network call.
pub fn verify_identity(
    registry: &dyn IdentityRegistry,
    cache: &Mutex<CacheStore>,
    mbid: &str,
    ttl_secs: u64,
    now: i64,
) -> Findings {
    let cached = cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup_fresh(mbid, now, ttl_secs)
        .cloned();

    let mut findings = Findings::new();
    let state = match cached {
        Some(entry) => {
            log::debug!("registry: cache hit for {} (ok={})", mbid, entry.ok);
            Some(entry)
        }
        None => {
            let fresh = match registry.lookup_artist(mbid) {
                LookupOutcome::Confirmed { name } => Some(CacheEntry::confirmed(now, name)),
                LookupOutcome::NotFound => Some(CacheEntry::denied(now)),
                LookupOutcome::Unreachable(cause) => {
                    log::warn!("registry: lookup for {} failed: {}", mbid, cause);
                    findings.error(
                        FindingKind::RemoteVerification,
                        mbid,
                        "could not contact MusicBrainz for MBID validation",
                    );
                    None
                }
            };
            if let Some(entry) = &fresh {
                cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record(mbid, entry.clone());
            }
            fresh
        }
    };

    match state {
        Some(CacheEntry { ok: true, name, .. }) => match name {
            Some(name) => findings.info(
                mbid,
                format!(
                    "MusicBrainz artist found: '{}'. Please confirm the artist for this MBID (type validation).",
                    name
                ),
            ),
            None => findings.info(
                mbid,
                "MusicBrainz artist found but name unavailable; please confirm manually.",
            ),
        },
        Some(CacheEntry { ok: false, .. }) => findings.error(
            FindingKind::RemoteRejection,
            mbid,
            "MBID not found on MusicBrainz or network error",
        ),
        None => findings.error(
            FindingKind::RemoteVerification,
            mbid,
            "MBID not found on MusicBrainz or network error",
        ),
    }
    findings
}
