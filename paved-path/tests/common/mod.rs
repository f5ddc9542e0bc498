//! Common test utilities for integration tests.
//!
//! This module provides helper functions for testing the paved-path library.

use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Creates a temporary directory for testing.
///
/// The directory will be automatically cleaned up when the returned
/// `TempDir` is dropped.
#[allow(dead_code)]
pub fn create_temp_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::tempdir()
}

/// Writes `contents` to `dir/name` and returns the full path.
#[allow(dead_code)]
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Rewrites a file as another process would, then pushes its mtime forward.
///
/// Filesystems with coarse timestamps can give two quick writes the same
/// mtime; moving it explicitly keeps change detection deterministic.
#[allow(dead_code)]
pub fn modify_externally(path: &Path, contents: &str) {
    let previous = fs::metadata(path).and_then(|m| m.modified()).ok();
    fs::write(path, contents).unwrap();
    set_mtime(
        path,
        previous.unwrap_or_else(SystemTime::now) + Duration::from_secs(2),
    );
}

/// Sets a file's modification time.
#[allow(dead_code)]
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// Names of the files in `dir`, sorted.
#[allow(dead_code)]
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// RAII guard for setting and restoring environment variables.
///
/// Tests using it should be marked `#[serial]`.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    /// Create a guard that removes the env var.
    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}

/// Clears every `PAVED_PATH_*` override for the life of the returned guards.
#[allow(dead_code)]
pub fn clear_paved_env_vars() -> Vec<EnvGuard> {
    [
        "PAVED_PATH_SIGNATURE",
        "PAVED_PATH_VALIDATION",
        "PAVED_PATH_WRITE_THROUGH",
        "PAVED_PATH_CREATE_PARENTS",
    ]
    .iter()
    .map(|key| EnvGuard::remove(key))
    .collect()
}
