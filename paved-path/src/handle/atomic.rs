//! Write-to-temporary-then-rename.
//!
//! The temporary file is created in the target's own directory so the final
//! rename never crosses filesystems. Until [`StagedWrite::commit`] runs, the
//! file at the target path is untouched; dropping a staged write removes the
//! temporary file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Bytes written and synced to a temporary sibling of `target`.
#[derive(Debug)]
pub(crate) struct StagedWrite {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedWrite {
    pub(crate) fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Renames the temporary file over the target.
    ///
    /// Returns the open, renamed file so callers can stat exactly what was
    /// written.
    pub(crate) fn commit(self) -> Result<File> {
        let target = self.target;
        self.temp.persist(&target).map_err(|e| Error::Write {
            path: target.clone(),
            temp_created: true,
            source: e.error,
        })
    }
}

/// Writes `bytes` to a temporary file next to `target`.
pub(crate) fn stage(target: &Path, bytes: &[u8], create_parents: bool) -> Result<StagedWrite> {
    let write_error = |temp_created: bool| {
        move |source: std::io::Error| Error::Write {
            path: target.to_path_buf(),
            temp_created,
            source,
        }
    };

    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if create_parents {
        fs::create_dir_all(parent).map_err(write_error(false))?;
    }

    let name = target
        .file_name()
        .map_or_else(|| "paved".into(), |n| n.to_string_lossy());
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_error(false))?;

    // Keep the target's permissions instead of the temp file's private 0600.
    if let Ok(existing) = fs::metadata(target) {
        if let Err(e) = fs::set_permissions(temp.path(), existing.permissions()) {
            log::warn!(
                "could not copy permissions of {} to temporary file: {e}",
                target.display()
            );
        }
    }

    temp.write_all(bytes).map_err(write_error(true))?;
    temp.as_file().sync_all().map_err(write_error(true))?;

    Ok(StagedWrite {
        target: target.to_path_buf(),
        temp,
    })
}

/// Stages and commits in one step.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8], create_parents: bool) -> Result<File> {
    stage(target, bytes, create_parents)?.commit()
}
