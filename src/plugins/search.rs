//! Artist search: find candidate MBIDs for a new logo entry.
//!
//! Thin wrapper over the MusicBrainz artist search endpoint. Not part of
//! validation; a failed search prints the error and shows no results.

use crate::core::error::BandLogosError;
use crate::core::registry::MusicBrainzClient;
use serde::Deserialize;

pub const ARTIST_PAGE_BASE: &str = "https://musicbrainz.org/artist";
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifeSpan {
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistCandidate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "life-span", default)]
    pub life_span: Option<LifeSpan>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Vec<ArtistCandidate>,
}

pub fn search_url(base_url: &str, name: &str, limit: u32) -> String {
    format!(
        "{}/artist?query=artist:{}&fmt=json&limit={}",
        base_url,
        urlencoding::encode(name),
        limit
    )
}

pub fn parse_search_response(body: serde_json::Value) -> Result<Vec<ArtistCandidate>, BandLogosError> {
    let response: SearchResponse = serde_json::from_value(body)?;
    Ok(response.artists)
}

pub fn search_artists(
    client: &MusicBrainzClient,
    name: &str,
    limit: u32,
) -> Result<Vec<ArtistCandidate>, BandLogosError> {
    let url = search_url(&client.settings().base_url, name, limit);
    let body = client
        .get_json(&url)
        .map_err(|e| BandLogosError::RegistryError(e.to_string()))?;
    parse_search_response(body)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub fn render_candidates(artists: &[ArtistCandidate]) -> String {
    if artists.is_empty() {
        return "No results\n".to_string();
    }
    let mut out = String::new();
    for artist in artists {
        out.push_str(&format!("MBID: {}\n", artist.id));
        out.push_str(&format!("  Name:        {}\n", non_empty(&artist.name).unwrap_or("")));
        if let Some(dis) = non_empty(&artist.disambiguation) {
            out.push_str(&format!("  Disambiguation: {}\n", dis));
        }
        if let Some(country) = non_empty(&artist.country) {
            out.push_str(&format!("  Country:     {}\n", country));
        }
        let span = artist.life_span.clone().unwrap_or_default();
        let begin = non_empty(&span.begin).unwrap_or("");
        let end = non_empty(&span.end).unwrap_or("");
        if !begin.is_empty() || !end.is_empty() {
            out.push_str(&format!("  Life-span:   {} - {}\n", begin, end));
        }
        out.push_str(&format!("  URL:         {}/{}\n", ARTIST_PAGE_BASE, artist.id));
        out.push('\n');
    }
    out
}

/// Run a search and print the candidates. Registry failures are printed,
/// not propagated.
pub fn run_search(client: &MusicBrainzClient, name: &str, limit: u32) {
    let artists = match search_artists(client, name, limit) {
        Ok(artists) => artists,
        Err(e) => {
            log::warn!("search: {}", e);
            println!("Error contacting MusicBrainz: {}", e);
            Vec::new()
        }
    };
    print!("{}", render_candidates(&artists));
}
