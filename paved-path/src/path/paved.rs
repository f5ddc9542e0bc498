//! The [`PavedPath`] value type.

use std::fmt;
use std::fs;
use std::io;
use std::ops::Div;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::codec::CodecRegistry;
use crate::config::HandleConfig;
use crate::error::{Error, Result};
use crate::handle::PathHandle;
use crate::path::normalize;
use crate::path::segment::IntoSegment;

/// A filesystem path assembled from heterogeneous segments.
///
/// `PavedPath` is a plain value: it owns no cache. Call [`PavedPath::handle`]
/// to get a caching [`PathHandle`] for the file it names.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use paved_path::PavedPath;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let path = PavedPath::new("runs") / day / 7 / "metrics.json";
/// assert_eq!(path.to_string(), "runs/2024-03-01/7/metrics.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PavedPath {
    inner: PathBuf,
}

impl PavedPath {
    /// Creates a path from a single segment.
    pub fn new(segment: impl IntoSegment) -> Self {
        Self {
            inner: segment.into_segment(),
        }
    }

    /// Creates a path by joining every segment in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use paved_path::PavedPath;
    ///
    /// let path = PavedPath::from_segments([1, 2, 3]);
    /// assert_eq!(path, PavedPath::new("1/2/3"));
    /// ```
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoSegment,
    {
        let inner = segments
            .into_iter()
            .fold(PathBuf::new(), |acc, segment| acc.join(segment.into_segment()));
        Self { inner }
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl IntoSegment) -> Self {
        Self {
            inner: self.inner.join(segment.into_segment()),
        }
    }

    /// Borrows the underlying path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Consumes the value, returning the underlying path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.inner
    }

    /// Absolute, lexically normalized form of this path.
    ///
    /// # Errors
    ///
    /// See [`normalize::normalize`].
    pub fn normalized(&self) -> Result<PathBuf> {
        normalize::normalize(&self.inner)
    }

    /// The file's modification time in the local time zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path does not exist, or
    /// [`Error::Io`] if the platform cannot report modification times.
    pub fn modified_at(&self) -> Result<DateTime<Local>> {
        let modified = fs::metadata(&self.inner)
            .and_then(|meta| meta.modified())
            .map_err(|e| Error::from_io(&self.inner, e))?;
        Ok(DateTime::<Local>::from(modified))
    }

    /// Whether the file exists and, if `since` is given, was modified after it.
    ///
    /// A missing file is never up to date.
    #[must_use]
    pub fn is_up_to_date(&self, since: Option<DateTime<Local>>) -> bool {
        if !self.inner.exists() {
            return false;
        }
        match since {
            None => true,
            Some(timestamp) => self
                .modified_at()
                .is_ok_and(|modified| modified > timestamp),
        }
    }

    /// The negation of [`PavedPath::is_up_to_date`].
    #[must_use]
    pub fn is_outdated(&self, since: Option<DateTime<Local>>) -> bool {
        !self.is_up_to_date(since)
    }

    /// Deletes the file, or the directory and everything beneath it.
    ///
    /// A path that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if removal fails.
    pub fn delete(&self) -> Result<()> {
        let meta = match fs::symlink_metadata(&self.inner) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::from_io(&self.inner, e)),
        };

        let removed = if meta.is_dir() {
            fs::remove_dir_all(&self.inner)
        } else {
            fs::remove_file(&self.inner)
        };
        removed.map_err(|source| Error::Io {
            path: self.inner.clone(),
            source,
        })
    }

    /// A caching handle for this path with the default codecs and settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be normalized.
    pub fn handle(&self) -> Result<PathHandle> {
        PathHandle::new(&self.inner)
    }

    /// A caching handle using the given registry and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be normalized.
    pub fn handle_with(
        &self,
        registry: Arc<CodecRegistry>,
        config: HandleConfig,
    ) -> Result<PathHandle> {
        PathHandle::builder(&self.inner)
            .registry(registry)
            .config(config)
            .build()
    }
}

impl<S: IntoSegment> Div<S> for PavedPath {
    type Output = PavedPath;

    fn div(self, rhs: S) -> Self::Output {
        Self {
            inner: self.inner.join(rhs.into_segment()),
        }
    }
}

impl<S: IntoSegment> Div<S> for &PavedPath {
    type Output = PavedPath;

    fn div(self, rhs: S) -> Self::Output {
        self.join(rhs)
    }
}

impl IntoSegment for PavedPath {
    fn into_segment(self) -> PathBuf {
        self.inner
    }
}

impl IntoSegment for &PavedPath {
    fn into_segment(self) -> PathBuf {
        self.inner.clone()
    }
}

impl AsRef<Path> for PavedPath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl From<PathBuf> for PavedPath {
    fn from(inner: PathBuf) -> Self {
        Self { inner }
    }
}

impl From<&str> for PavedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for PavedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.display())
    }
}
