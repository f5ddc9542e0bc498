//! File signatures used to decide whether a cache is still valid.

use std::fs::Metadata;
use std::time::SystemTime;

use xxhash_rust::xxh3::xxh3_64;

/// A cheap fingerprint of a file's state.
///
/// The modification time and size come from a single stat call. The digest
/// is only present when content hashing is enabled; it is computed from
/// bytes the handle already holds, so recording it never costs a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    modified: Option<SystemTime>,
    len: u64,
    digest: Option<u64>,
}

impl Signature {
    /// Signature from file metadata, without a digest.
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            digest: None,
        }
    }

    /// Returns this signature with the digest of `bytes` attached.
    #[must_use]
    pub fn with_digest(mut self, bytes: &[u8]) -> Self {
        self.digest = Some(digest(bytes));
        self
    }

    /// Modification time, if the platform reports one.
    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Size in bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file was empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Content digest, when one was recorded.
    #[must_use]
    pub const fn digest(&self) -> Option<u64> {
        self.digest
    }

    /// Compares only the stat-derived parts (mtime and size).
    #[must_use]
    pub fn same_stat(&self, other: &Self) -> bool {
        self.modified == other.modified && self.len == other.len
    }
}

/// xxh3 digest of a byte slice.
#[must_use]
pub fn digest(bytes: &[u8]) -> u64 {
    xxh3_64(bytes)
}
