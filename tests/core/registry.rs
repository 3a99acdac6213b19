use bandlogos::core::cache::{CACHE_FILE_NAME, CacheEntry, CacheStore};
use bandlogos::core::capabilities::Capabilities;
use bandlogos::core::config::ValidateConfig;
use bandlogos::core::finding::{FindingKind, Severity};
use bandlogos::core::registry::{IdentityRegistry, LookupOutcome};
use bandlogos::core::time::now_epoch_secs;
use bandlogos::core::validate::{ValidationReport, run_validation};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

const KNOWN: &str = "65f4f0c5-ef9e-490c-aee3-909e7ae6b2ab";
const UNKNOWN: &str = "00000000-0000-0000-0000-000000000000";
const FLAKY: &str = "5b11f4ce-a62d-471e-81fc-a69a8278c7da";

/// In-memory registry that records every live lookup.
struct FakeRegistry {
    answers: HashMap<String, LookupOutcome>,
    calls: Mutex<Vec<String>>,
}

impl FakeRegistry {
    fn new() -> Self {
        let mut answers = HashMap::new();
        answers.insert(
            KNOWN.to_string(),
            LookupOutcome::Confirmed {
                name: Some("Metallica".to_string()),
            },
        );
        answers.insert(UNKNOWN.to_string(), LookupOutcome::NotFound);
        answers.insert(
            FLAKY.to_string(),
            LookupOutcome::Unreachable("request failed: timed out".to_string()),
        );
        Self {
            answers,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl IdentityRegistry for FakeRegistry {
    fn lookup_artist(&self, mbid: &str) -> LookupOutcome {
        self.calls.lock().unwrap().push(mbid.to_string());
        self.answers
            .get(mbid)
            .cloned()
            .unwrap_or(LookupOutcome::NotFound)
    }
}

fn add_entry(root: &Path, id: &str) {
    let dir = root.join("artists").join(id);
    fs::create_dir_all(&dir).unwrap();
    let mut img = image::RgbaImage::from_pixel(1024, 1024, image::Rgba([0, 0, 0, 255]));
    img.put_pixel(10, 10, image::Rgba([0, 0, 0, 0]));
    img.save(dir.join("logo.png")).unwrap();
    fs::write(dir.join("metadata.yaml"), format!("mbid: {}\n", id)).unwrap();
}

fn run_remote(root: &Path, registry: &FakeRegistry) -> ValidationReport {
    let mut config = ValidateConfig::for_root(root);
    config.check_mb = true;
    run_validation(
        &config,
        Capabilities::detect(),
        Some(registry as &dyn IdentityRegistry),
    )
    .unwrap()
}

#[test]
fn confirmed_mbid_is_advisory_and_cached() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), KNOWN);
    let registry = FakeRegistry::new();

    let report = run_remote(tmp.path(), &registry);
    assert!(report.passed());
    let info = report.findings.iter().next().unwrap();
    assert_eq!(info.severity, Severity::Info);
    assert_eq!(
        info.message,
        "MusicBrainz artist found: 'Metallica'. Please confirm the artist for this MBID (type validation)."
    );

    let cache = CacheStore::load(tmp.path());
    let entry = cache.get(KNOWN).unwrap();
    assert!(entry.ok);
    assert_eq!(entry.name.as_deref(), Some("Metallica"));
}

#[test]
fn second_run_within_ttl_uses_cache() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), KNOWN);

    let first_registry = FakeRegistry::new();
    let first = run_remote(tmp.path(), &first_registry);
    assert_eq!(first_registry.calls(), vec![KNOWN.to_string()]);

    let second_registry = FakeRegistry::new();
    let second = run_remote(tmp.path(), &second_registry);
    assert!(second_registry.calls().is_empty());
    assert_eq!(first.findings, second.findings);
}

#[test]
fn preseeded_cache_entry_avoids_live_call() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), KNOWN);
    let mut cache = CacheStore::load(tmp.path());
    cache.record(
        KNOWN,
        CacheEntry::confirmed(now_epoch_secs(), Some("Cached Name".to_string())),
    );
    cache.save().unwrap();

    let registry = FakeRegistry::new();
    let report = run_remote(tmp.path(), &registry);
    assert!(registry.calls().is_empty());
    assert!(
        report
            .findings
            .iter()
            .next()
            .unwrap()
            .message
            .contains("'Cached Name'")
    );
}

#[test]
fn expired_cache_entry_is_refreshed() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), KNOWN);
    fs::write(
        tmp.path().join(CACHE_FILE_NAME),
        format!(r#"{{"{}": {{"ts": 0, "ok": false, "name": null}}}}"#, KNOWN),
    )
    .unwrap();

    let registry = FakeRegistry::new();
    let report = run_remote(tmp.path(), &registry);
    assert_eq!(registry.calls(), vec![KNOWN.to_string()]);
    assert!(report.passed());
    assert!(CacheStore::load(tmp.path()).get(KNOWN).unwrap().ok);
}

#[test]
fn unknown_mbid_is_rejected_and_cached_as_denied() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), UNKNOWN);
    let registry = FakeRegistry::new();

    let report = run_remote(tmp.path(), &registry);
    assert!(!report.passed());
    let errors: Vec<_> = report.findings.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, FindingKind::RemoteRejection);
    assert_eq!(errors[0].message, "MBID not found on MusicBrainz or network error");

    let cached = CacheStore::load(tmp.path());
    assert!(!cached.get(UNKNOWN).unwrap().ok);
}

#[test]
fn transient_failure_is_reported_but_not_cached() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), FLAKY);
    add_entry(tmp.path(), KNOWN);
    let registry = FakeRegistry::new();

    let report = run_remote(tmp.path(), &registry);
    let flaky: Vec<String> = report
        .findings
        .for_entry(FLAKY)
        .map(|f| f.message.clone())
        .collect();
    assert_eq!(
        flaky,
        vec![
            "could not contact MusicBrainz for MBID validation",
            "MBID not found on MusicBrainz or network error",
        ]
    );

    // The cache is still written for the rest of the run.
    let cache = CacheStore::load(tmp.path());
    assert!(cache.get(FLAKY).is_none());
    assert!(cache.get(KNOWN).is_some());

    // Next run retries the flaky id live.
    let retry = FakeRegistry::new();
    run_remote(tmp.path(), &retry);
    assert_eq!(retry.calls(), vec![FLAKY.to_string()]);
}

#[test]
fn malformed_ids_never_reach_registry() {
    let tmp = tempdir().unwrap();
    add_entry(tmp.path(), "not-a-uuid");
    let registry = FakeRegistry::new();

    let report = run_remote(tmp.path(), &registry);
    assert!(registry.calls().is_empty());
    assert_eq!(report.findings.error_count(), 1);
}

#[test]
fn parallel_remote_run_keeps_entry_order() {
    let tmp = tempdir().unwrap();
    for id in [KNOWN, UNKNOWN, FLAKY] {
        add_entry(tmp.path(), id);
    }

    let sequential = run_remote(tmp.path(), &FakeRegistry::new());
    fs::remove_file(tmp.path().join(CACHE_FILE_NAME)).unwrap();

    let mut config = ValidateConfig::for_root(tmp.path());
    config.check_mb = true;
    config.parallel = true;
    let registry = FakeRegistry::new();
    let parallel = run_validation(
        &config,
        Capabilities::detect(),
        Some(&registry as &dyn IdentityRegistry),
    )
    .unwrap();

    assert_eq!(sequential.findings, parallel.findings);
    let mut calls = registry.calls();
    calls.sort();
    let mut expected = vec![KNOWN.to_string(), UNKNOWN.to_string(), FLAKY.to_string()];
    expected.sort();
    assert_eq!(calls, expected);
}
