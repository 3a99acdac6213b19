//! MusicBrainz identifier format.

use regex::Regex;
use std::sync::LazyLock;

static MBID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// True when `candidate` has the canonical 8-4-4-4-12 hex UUID shape.
///
/// Case-insensitive; braces, URNs and the 32-digit simple form are rejected.
pub fn is_mbid(candidate: &str) -> bool {
    MBID_PATTERN.is_match(candidate)
}
