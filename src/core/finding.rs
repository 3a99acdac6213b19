//! Findings: the problems and advisory notes produced by a validation run.
//!
//! Every check returns a [`Findings`] value instead of writing to shared
//! state; the orchestrator concatenates them in entry order.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Info,
}

/// Origin of a finding. Errors of different kinds render the same way but
/// stay distinguishable for callers and `--format json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Missing file, malformed MBID, bad logo geometry or transparency.
    Structural,
    /// metadata.yaml declares a different MBID than its directory.
    IdentityMismatch,
    /// A parsing capability is not compiled into this build.
    DependencyMissing,
    /// The registry could not be reached or answered unexpectedly.
    RemoteVerification,
    /// The registry does not know the MBID.
    RemoteRejection,
    /// Invocation input problem, e.g. an unreadable paths file.
    Input,
    /// Manual confirmation prompt.
    Advisory,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::Structural => "structural",
            FindingKind::IdentityMismatch => "identity_mismatch",
            FindingKind::DependencyMissing => "dependency_missing",
            FindingKind::RemoteVerification => "remote_verification",
            FindingKind::RemoteRejection => "remote_rejection",
            FindingKind::Input => "input",
            FindingKind::Advisory => "advisory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub entry_id: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entry_id, self.message)
    }
}

/// Ordered accumulator of findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Findings {
    items: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, kind: FindingKind, entry_id: &str, message: impl Into<String>) {
        self.items.push(Finding {
            severity: Severity::Error,
            kind,
            entry_id: entry_id.to_string(),
            message: message.into(),
        });
    }

    pub fn info(&mut self, entry_id: &str, message: impl Into<String>) {
        self.items.push(Finding {
            severity: Severity::Info,
            kind: FindingKind::Advisory,
            entry_id: entry_id.to_string(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Findings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.items.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn infos(&self) -> impl Iterator<Item = &Finding> {
        self.items.iter().filter(|f| f.severity == Severity::Info)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn info_count(&self) -> usize {
        self.infos().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Findings recorded against one entry, in order.
    pub fn for_entry<'a>(&'a self, entry_id: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.items.iter().filter(move |f| f.entry_id == entry_id)
    }
}

impl FromIterator<Findings> for Findings {
    fn from_iter<I: IntoIterator<Item = Findings>>(iter: I) -> Self {
        let mut out = Findings::new();
        for findings in iter {
            out.extend(findings);
        }
        out
    }
}
