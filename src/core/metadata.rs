//! `metadata.yaml` parsing and identity cross-check.

use crate::core::finding::{FindingKind, Findings};
use crate::core::validate::METADATA_FILE_NAME;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// The fields of `metadata.yaml` the checker cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDocument {
    pub mbid: Option<String>,
}

/// Parse a metadata document. Empty and non-mapping documents carry no
/// fields; only malformed YAML is an error.
pub fn parse_metadata(content: &str) -> Result<MetadataDocument, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(MetadataDocument::default());
    }
    let value: Value = serde_yaml::from_str(content)?;
    let mbid = match &value {
        Value::Mapping(map) => map.get("mbid").and_then(render_scalar),
        _ => None,
    };
    Ok(MetadataDocument { mbid })
}

/// Falsy values (null, false, zero, empty string or collection) count as no
/// `mbid`; anything else is compared as its text.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Sequence(seq) if seq.is_empty() => None,
        Value::Mapping(map) if map.is_empty() => None,
        Value::Tagged(tagged) => render_scalar(&tagged.value),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

pub fn check_metadata(path: &Path, entry_id: &str) -> Findings {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| parse_metadata(&content).map_err(|e| e.to_string()));
    match parsed {
        Ok(doc) => check_document(&doc, entry_id),
        Err(cause) => {
            let mut findings = Findings::new();
            findings.error(
                FindingKind::Structural,
                entry_id,
                format!("{} cannot be read - {}", METADATA_FILE_NAME, cause),
            );
            findings
        }
    }
}

pub fn check_document(doc: &MetadataDocument, entry_id: &str) -> Findings {
    let mut findings = Findings::new();
    match doc.mbid.as_deref() {
        Some(mbid) if !mbid.is_empty() && mbid != entry_id => findings.error(
            FindingKind::IdentityMismatch,
            entry_id,
            format!(
                "{} mbid does not match directory name ({} != {})",
                METADATA_FILE_NAME, mbid, entry_id
            ),
        ),
        _ => {}
    }
    findings
}
