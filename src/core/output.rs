//! Report rendering for the `validate` command.
//!
//! Text layout: advisory notes first, then failures, then one summary line.

use crate::core::finding::Finding;
use crate::core::time;
use crate::core::validate::ValidationReport;
use colored::Colorize;
use serde_json::Value as JsonValue;

pub const NO_ARTISTS_NOTICE: &str = "No artists/ directory found; skipping validation.";
pub const ADVISORY_HEADING: &str = "Manual checks / suggestions:";
pub const FAILURE_HEADING: &str = "Validation failed with the following issues:";
pub const PASS_LINE: &str = "Validation passed: no issues found";

/// Closing line of a failed run.
pub fn failure_line(error_count: usize) -> String {
    format!("Validation failed: {} issue(s) found", error_count)
}

/// Render the report as terminal text. `color` adds ANSI styling to the
/// headings only, so the finding lines stay grep-friendly.
pub fn render_text(report: &ValidationReport, color: bool) -> String {
    if !report.artists_dir_present {
        return format!("{}\n", NO_ARTISTS_NOTICE);
    }

    let mut out = String::new();
    let infos: Vec<&Finding> = report.findings.infos().collect();
    let errors: Vec<&Finding> = report.findings.errors().collect();

    if !infos.is_empty() {
        out.push('\n');
        out.push_str(&heading(ADVISORY_HEADING, color, false));
        push_items(&mut out, &infos);
    }

    if !errors.is_empty() {
        out.push('\n');
        out.push_str(&heading(FAILURE_HEADING, color, true));
        push_items(&mut out, &errors);
        out.push('\n');
        let summary = failure_line(errors.len());
        if color {
            out.push_str(&summary.bright_red().to_string());
        } else {
            out.push_str(&summary);
        }
    } else {
        out.push('\n');
        if color {
            out.push_str(&PASS_LINE.bright_green().to_string());
        } else {
            out.push_str(PASS_LINE);
        }
    }
    out.push('\n');
    out
}

fn heading(text: &str, color: bool, failure: bool) -> String {
    match (color, failure) {
        (false, _) => format!("{}\n", text),
        (true, false) => format!("{}\n", text.bright_yellow().bold()),
        (true, true) => format!("{}\n", text.bright_red().bold()),
    }
}

fn push_items(out: &mut String, findings: &[&Finding]) {
    for finding in findings {
        out.push_str("- ");
        out.push_str(&finding.to_string());
        out.push('\n');
    }
}

pub fn render_json(report: &ValidationReport) -> JsonValue {
    let status = if report.passed() { "pass" } else { "fail" };
    time::command_envelope(
        "validate",
        status,
        serde_json::json!({
            "artists_dir_present": report.artists_dir_present,
            "entries_checked": report.entries_checked,
            "errors": report.findings.error_count(),
            "infos": report.findings.info_count(),
            "findings": report.findings,
        }),
    )
}
