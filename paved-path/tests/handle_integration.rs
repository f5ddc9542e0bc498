//! Integration tests for caching handles.
//!
//! These tests drive [`PathHandle`] through the public API only and use
//! [`IoStats`] to assert how much disk work each sequence of operations did.

mod common;

use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;

use common::{create_temp_dir, dir_entries, modify_externally, set_mtime, write_fixture};
use paved_path::{
    CacheState, Error, HandleConfig, IoStats, PathHandle, PavedPath, SignatureMode, Validation,
};
use serde_json::json;

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_per_codec() {
    let dir = create_temp_dir().unwrap();
    let cases = [
        ("a.json", json!({"list": [1, 2.5, "x"], "nested": {"ok": true}})),
        ("b.toml", json!({"name": "svc", "ports": [80, 443]})),
        ("c.txt", json!("plain text\nwith two lines")),
    ];

    for (name, value) in cases {
        let mut writer = PathHandle::new(dir.path().join(name)).unwrap();
        writer.write(&value).unwrap();
        assert_eq!(writer.read().unwrap(), value, "cached read of {name}");

        let mut reader = PathHandle::new(dir.path().join(name)).unwrap();
        assert_eq!(reader.read().unwrap(), value, "fresh read of {name}");
    }
}

#[cfg(feature = "yaml")]
#[test]
fn test_round_trip_yaml() {
    let dir = create_temp_dir().unwrap();
    let value = json!({"stages": ["build", "test"], "parallel": 4});

    let mut writer = PathHandle::new(dir.path().join("ci.yml")).unwrap();
    writer.write(&value).unwrap();

    let mut reader = PathHandle::new(dir.path().join("ci.yml")).unwrap();
    assert_eq!(reader.read().unwrap(), value);
}

// ============================================================================
// Cache behavior
// ============================================================================

#[test]
fn test_repeated_reads_hit_disk_once() {
    let dir = create_temp_dir().unwrap();
    let path = write_fixture(dir.path(), "big.json", r#"{"k": "v"}"#);
    let mut handle = PathHandle::new(&path).unwrap();

    for _ in 0..100 {
        assert_eq!(handle.read().unwrap(), json!({"k": "v"}));
    }

    let stats = handle.stats();
    assert_eq!(stats.reads, 1);
    assert_eq!(stats.writes, 0);
    // Every read after the first validates with a stat.
    assert_eq!(stats.probes, 99);
}

#[test]
fn test_config_scenario() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("config.json");
    let mut handle = PathHandle::new(&path).unwrap();

    handle.write(&json!({"a": 1})).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"a": 1}));
    assert_eq!(handle.stats().reads, 0);

    modify_externally(&path, r#"{"a": 2}"#);
    assert!(handle.is_stale());
    assert_eq!(handle.read().unwrap(), json!({"a": 2}));
    assert_eq!(handle.stats().reads, 1);
    assert!(!handle.is_stale());

    handle.write(&json!({"a": 3})).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"a": 3}));
    assert_eq!(handle.stats().reads, 1);
    assert_eq!(handle.stats().writes, 2);
}

#[test]
fn test_config_scenario_with_content_hash() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("config.json");
    let mut handle = PathHandle::builder(&path)
        .signature(SignatureMode::ContentHash)
        .build()
        .unwrap();

    handle.write(&json!({"a": 1})).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"a": 1}));
    assert_eq!(handle.stats().reads, 0);

    modify_externally(&path, r#"{"a": 2}"#);
    assert!(handle.is_stale());
    assert_eq!(handle.read().unwrap(), json!({"a": 2}));
    assert_eq!(handle.stats().reads, 1);

    handle.write(&json!({"a": 3})).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"a": 3}));
    assert_eq!(handle.stats().reads, 1);
}

#[test]
fn test_touch_without_change() {
    let dir = create_temp_dir().unwrap();
    let path = write_fixture(dir.path(), "same.txt", "unchanged");

    let mut by_stat = PathHandle::new(&path).unwrap();
    let mut by_hash = PathHandle::builder(&path)
        .signature(SignatureMode::ContentHash)
        .build()
        .unwrap();
    by_stat.read().unwrap();
    by_hash.read().unwrap();

    // Same bytes, new mtime.
    modify_externally(&path, "unchanged");

    // Both treat the file as changed: the stat moved, and the digest is only
    // consulted when the stat matches.
    assert!(by_stat.is_stale());
    assert!(by_hash.is_stale());
    assert_eq!(by_hash.read().unwrap(), json!("unchanged"));
    assert_eq!(by_hash.stats().reads, 2);
}

#[test]
fn test_same_size_same_mtime_rewrite() {
    let dir = create_temp_dir().unwrap();
    let path = write_fixture(dir.path(), "tick.txt", "AAAA");

    let mut by_stat = PathHandle::new(&path).unwrap();
    let mut by_hash = PathHandle::builder(&path)
        .signature(SignatureMode::ContentHash)
        .build()
        .unwrap();
    by_stat.read().unwrap();
    by_hash.read().unwrap();
    let mtime = fs::metadata(&path).unwrap().modified().unwrap();

    fs::write(&path, "BBBB").unwrap();
    set_mtime(&path, mtime);

    // The stat signature cannot see this rewrite; the content hash can.
    assert!(!by_stat.is_stale());
    assert_eq!(by_stat.read().unwrap(), json!("AAAA"));
    assert!(by_hash.is_stale());
    assert_eq!(by_hash.read().unwrap(), json!("BBBB"));
}

#[test]
fn test_trusted_cache_skips_validation() {
    let dir = create_temp_dir().unwrap();
    let path = write_fixture(dir.path(), "trusted.json", "[1]");
    let config = HandleConfig {
        validation: Validation::Never,
        ..Default::default()
    };
    let mut handle = PavedPath::new(&path)
        .handle_with(Arc::default(), config)
        .unwrap();

    handle.read().unwrap();
    modify_externally(&path, "[1, 2]");
    assert_eq!(handle.read().unwrap(), json!([1]));
    assert_eq!(
        handle.stats(),
        IoStats {
            reads: 1,
            ..Default::default()
        }
    );

    assert_eq!(handle.reload().unwrap(), json!([1, 2]));
}

#[test]
fn test_invalidate_then_read() {
    let dir = create_temp_dir().unwrap();
    let mut handle = PathHandle::new(dir.path().join("x.json")).unwrap();
    handle.write(&json!({"v": 1})).unwrap();

    handle.invalidate();
    assert_eq!(handle.state(), CacheState::Empty);
    assert_eq!(handle.read().unwrap(), json!({"v": 1}));
    assert_eq!(handle.stats().reads, 1);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_missing_file() {
    let dir = create_temp_dir().unwrap();
    let mut handle = PathHandle::new(dir.path().join("nope.json")).unwrap();

    match handle.read().unwrap_err() {
        Error::NotFound { path } => assert!(path.ends_with("nope.json")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(handle.is_stale());
}

#[test]
fn test_default_value_until_file_appears() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("late.json");
    let mut handle = PathHandle::builder(&path)
        .default_value(json!({"ready": false}))
        .build()
        .unwrap();

    assert_eq!(handle.read().unwrap(), json!({"ready": false}));
    fs::write(&path, r#"{"ready": true}"#).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"ready": true}));
}

#[test]
fn test_decode_error_names_path_and_codec() {
    let dir = create_temp_dir().unwrap();
    let path = write_fixture(dir.path(), "bad.toml", "= nope");
    let mut handle = PathHandle::new(&path).unwrap();

    let err = handle.read().unwrap_err();
    match &err {
        Error::Decode { path: p, codec, .. } => {
            assert_eq!(p, &path);
            assert_eq!(codec, "toml");
        }
        other => panic!("expected Decode, got {other:?}"),
    }

    // Fixing the file makes the next read succeed.
    modify_externally(&path, "key = 'value'");
    assert_eq!(handle.read().unwrap(), json!({"key": "value"}));
}

#[cfg(unix)]
#[test]
fn test_write_into_read_only_directory_keeps_cache() {
    use std::os::unix::fs::PermissionsExt;

    let dir = create_temp_dir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    let path = write_fixture(&locked, "state.json", r#"{"n": 1}"#);

    let mut handle = PathHandle::new(&path).unwrap();
    assert_eq!(handle.read().unwrap(), json!({"n": 1}));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    let result = handle.write(&json!({"n": 2}));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // Running as root ignores directory permissions.
    if let Err(err) = result {
        assert!(matches!(err, Error::Write { .. }));
        assert_eq!(handle.state(), CacheState::Fresh);
        assert_eq!(handle.read().unwrap(), json!({"n": 1}));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"n": 1}"#);
        assert_eq!(dir_entries(&locked), vec!["state.json".to_string()]);
    }
}

#[test]
fn test_write_without_parent_creation() {
    let dir = create_temp_dir().unwrap();
    let mut handle = PathHandle::builder(dir.path().join("missing/dir/out.txt"))
        .create_parents(false)
        .build()
        .unwrap();

    let err = handle.write_text("x").unwrap_err();
    assert!(matches!(
        err,
        Error::Write {
            temp_created: false,
            ..
        }
    ));
    assert_eq!(handle.state(), CacheState::Empty);
    assert!(!dir.path().join("missing").exists());
}

// ============================================================================
// Path building
// ============================================================================

#[test]
fn test_paved_path_builds_nested_handles() {
    let dir = create_temp_dir().unwrap();
    let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let run = PavedPath::new(dir.path()) / "runs" / day / 3_u8;

    let mut metrics = (&run / "metrics.json").handle().unwrap();
    metrics.write(&json!({"loss": 0.25})).unwrap();

    assert!(dir.path().join("runs/2024-03-09/3/metrics.json").is_file());
    assert!((&run / "metrics.json").is_up_to_date(None));

    // Deleting the run removes its directory tree and nothing above it.
    run.delete().unwrap();
    assert!(!dir.path().join("runs/2024-03-09/3").exists());
    assert!(dir.path().join("runs/2024-03-09").is_dir());
    assert!(metrics.is_stale());
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn test_handle_shared_behind_mutex() {
    let dir = create_temp_dir().unwrap();
    let handle = Arc::new(Mutex::new(
        PathHandle::new(dir.path().join("counter.json")).unwrap(),
    ));
    handle.lock().unwrap().write(&json!(0)).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                for _ in 0..10 {
                    let mut guard = handle.lock().unwrap();
                    let n = guard.read().unwrap().as_u64().unwrap();
                    guard.write(&json!(n + 1)).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut guard = handle.lock().unwrap();
    assert_eq!(guard.read().unwrap(), json!(40));
    assert_eq!(guard.stats().writes, 41);
    assert_eq!(guard.stats().reads, 0);
}
