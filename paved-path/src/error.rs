//! Error types for the paved-path library.
//!
//! Every failure surfaces to the caller as a typed [`Error`]. The only
//! condition that is never an error is a codec lookup miss, which falls back
//! to the plain-text codec.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Result type alias for operations that may fail with a paved-path error.
///
/// # Examples
///
/// ```
/// use paved_path::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the paved-path library.
#[derive(Debug, Error)]
pub enum Error {
    /// The file does not exist and no default value is configured.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The path that was read.
        path: PathBuf,
    },

    /// The file exists but its contents could not be parsed by the codec.
    #[error("failed to decode {} as {codec}: {source}", path.display())]
    Decode {
        /// The offending file.
        path: PathBuf,
        /// Name of the codec that rejected the bytes.
        codec: String,
        /// The parser's error.
        #[source]
        source: CodecError,
    },

    /// A value could not be serialized by the codec.
    #[error("failed to encode value for {} as {codec}: {source}", path.display())]
    Encode {
        /// The target file.
        path: PathBuf,
        /// Name of the codec that rejected the value.
        codec: String,
        /// The serializer's error.
        #[source]
        source: CodecError,
    },

    /// The atomic write failed; the file at `path` was not replaced.
    #[error(
        "failed to write {}{}: {source}",
        path.display(),
        if *.temp_created { " (temporary file was created)" } else { "" }
    )]
    Write {
        /// The target file.
        path: PathBuf,
        /// Whether the temporary sibling file had been created.
        temp_created: bool,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure (stat, read, delete).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Wraps an I/O error, mapping `NotFound` to [`Error::NotFound`].
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Check if error indicates the file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use paved_path::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::NotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a codec parse failure.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if error is permission-related.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Write { source, .. } | Self::Io { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}
