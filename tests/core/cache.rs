use bandlogos::core::cache::{CACHE_FILE_NAME, CacheEntry, CacheStore};
use bandlogos::core::capabilities::Capabilities;
use bandlogos::core::config::ValidateConfig;
use bandlogos::core::validate::run_validation;
use std::fs;
use tempfile::tempdir;

#[test]
fn failing_run_still_rewrites_cache() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("artists").join("not-a-uuid")).unwrap();
    let mut seeded = CacheStore::load(tmp.path());
    seeded.record("some-id", CacheEntry::denied(42));
    seeded.save().unwrap();

    let report = run_validation(
        &ValidateConfig::for_root(tmp.path()),
        Capabilities::detect(),
        None,
    )
    .unwrap();
    assert!(!report.passed());

    let reloaded = CacheStore::load(tmp.path());
    assert_eq!(reloaded.get("some-id"), Some(&CacheEntry::denied(42)));
}

#[test]
fn corrupt_cache_is_replaced_not_fatal() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("artists")).unwrap();
    fs::write(tmp.path().join(CACHE_FILE_NAME), "\u{0}\u{1}garbage").unwrap();

    let report = run_validation(
        &ValidateConfig::for_root(tmp.path()),
        Capabilities::detect(),
        None,
    )
    .unwrap();
    assert!(report.passed());

    let written = fs::read_to_string(tmp.path().join(CACHE_FILE_NAME)).unwrap();
    assert_eq!(written, "{}");
}

#[test]
fn reference_cache_file_is_readable() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join(CACHE_FILE_NAME),
        r#"{"65f4f0c5-ef9e-490c-aee3-909e7ae6b2ab": {"ts": 1700000000, "ok": true, "name": "Metallica"}}"#,
    )
    .unwrap();

    let cache = CacheStore::load(tmp.path());
    let entry = cache.get("65f4f0c5-ef9e-490c-aee3-909e7ae6b2ab").unwrap();
    assert_eq!(entry.ts, 1_700_000_000);
    assert!(entry.ok);
    assert!(entry.is_fresh(1_700_000_000 + 86_400, 86_400));
    assert!(!entry.is_fresh(1_700_000_000 + 86_401, 86_400));
}

#[test]
fn save_leaves_no_temp_file() {
    let tmp = tempdir().unwrap();
    let mut cache = CacheStore::load(tmp.path());
    cache.record("a", CacheEntry::confirmed(1, None));
    cache.save().unwrap();
    cache.record("b", CacheEntry::confirmed(2, None));
    cache.save().unwrap();

    let names: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![CACHE_FILE_NAME.to_string()]);
    assert_eq!(CacheStore::load(tmp.path()).len(), 2);
}
