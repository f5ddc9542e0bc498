//! Lexical path normalization.
//!
//! Handles are keyed by absolute, normalized paths: `~` expanded, relative
//! paths anchored at the current directory, `.` and `..` folded away.
//! Nothing here touches the filesystem or follows symlinks, so a handle can
//! be created for a file that does not exist yet.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` or `~/` to the home directory.
///
/// `~user` forms are rejected.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory is
/// unknown, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use paved_path::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/notes.txt")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("notes.txt"));
///
/// assert_eq!(expand_tilde(Path::new("/etc/hosts")).unwrap(), Path::new("/etc/hosts"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let text = path.to_str().ok_or_else(|| invalid("path contains invalid UTF-8"))?;
    let Some(rest) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| invalid("cannot determine home directory"))?;
    if rest.is_empty() {
        return Ok(home);
    }
    match rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Some(tail) => Ok(home.join(tail)),
        None => Err(invalid("~user syntax is not supported; use ~ or ~/path")),
    }
}

/// Fold `.` and `..` components out of a path.
///
/// # Errors
///
/// Returns an error if `..` would climb above the root.
///
/// # Examples
///
/// ```
/// use paved_path::path::normalize::resolve_components;
/// use std::path::Path;
///
/// let resolved = resolve_components(Path::new("/data/./raw/../clean/out.json")).unwrap();
/// assert_eq!(resolved, Path::new("/data/clean/out.json"));
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                resolved.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    resolved.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if at_root || !resolved.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "too many '..' components (escapes root)".to_string(),
                    });
                }
            }
        }
    }

    Ok(resolved)
}

/// Normalize a path to its absolute, lexically resolved form.
///
/// # Errors
///
/// Returns an error if tilde expansion fails, the current directory cannot
/// be determined, or the path escapes the root.
///
/// # Examples
///
/// ```no_run
/// use paved_path::path::normalize::normalize;
/// use std::path::Path;
///
/// let normalized = normalize(Path::new("./config/../config.json")).unwrap();
/// assert!(normalized.is_absolute());
/// assert!(normalized.ends_with("config.json"));
/// ```
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot get current directory: {e}"),
        })?;
        cwd.join(expanded)
    };

    resolve_components(&absolute)
}
