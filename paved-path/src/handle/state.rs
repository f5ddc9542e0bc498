//! The cache state machine.
//!
//! ```text
//!            read()               disk changed
//!   Empty ───────────► Fresh ─────────────────► Stale
//!     ▲                  ▲  ◄─────────────────────┘
//!     │                  │          read()
//!     │                  └── write() from any state
//!     └── invalidate() from any state
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::signature::Signature;

/// Observable state of a handle's cache.
///
/// # Examples
///
/// ```
/// use paved_path::CacheState;
///
/// assert_eq!(CacheState::Empty.to_string(), "empty");
/// assert!(CacheState::Fresh.is_populated());
/// assert!(!CacheState::Empty.is_populated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing cached.
    Empty,
    /// Cached content matched the file at the last check.
    Fresh,
    /// Cached content is known to differ from the file.
    Stale,
}

impl CacheState {
    /// Whether a cached entry exists.
    #[must_use]
    pub const fn is_populated(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Fresh => write!(f, "fresh"),
            Self::Stale => write!(f, "stale"),
        }
    }
}

/// One content version of the file: its bytes, their signature, and views
/// derived from those bytes on demand.
#[derive(Debug)]
pub(crate) struct CacheEntry {
    pub(crate) bytes: Arc<[u8]>,
    pub(crate) signature: Signature,
    pub(crate) text: Option<String>,
    pub(crate) value: Option<Value>,
}

impl CacheEntry {
    pub(crate) fn new(bytes: Arc<[u8]>, signature: Signature) -> Self {
        Self {
            bytes,
            signature,
            text: None,
            value: None,
        }
    }
}

/// Storage for the cache, one variant per [`CacheState`].
#[derive(Debug, Default)]
pub(crate) enum Slot {
    #[default]
    Empty,
    Fresh(CacheEntry),
    Stale(CacheEntry),
}

impl Slot {
    pub(crate) fn state(&self) -> CacheState {
        match self {
            Self::Empty => CacheState::Empty,
            Self::Fresh(_) => CacheState::Fresh,
            Self::Stale(_) => CacheState::Stale,
        }
    }

    pub(crate) fn entry(&self) -> Option<&CacheEntry> {
        match self {
            Self::Empty => None,
            Self::Fresh(entry) | Self::Stale(entry) => Some(entry),
        }
    }

    pub(crate) fn fresh_mut(&mut self) -> Option<&mut CacheEntry> {
        match self {
            Self::Fresh(entry) => Some(entry),
            _ => None,
        }
    }

    /// Moves `Fresh` to `Stale`; other states are unchanged.
    pub(crate) fn mark_stale(&mut self) {
        *self = match std::mem::take(self) {
            Self::Fresh(entry) => Self::Stale(entry),
            other => other,
        };
    }
}
