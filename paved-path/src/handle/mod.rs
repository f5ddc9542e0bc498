//! Caching file handles.
//!
//! A [`PathHandle`] mirrors one file. Reads go to disk at most once per
//! content version; writes go to disk once per call and are atomic. Whether
//! the cached copy still matches the file is decided by comparing
//! [`Signature`]s, which are cheap to compute (a stat call) and, optionally,
//! strengthened with a content hash.
//!
//! Handles are not synchronized. Mutating operations take `&mut self`, so a
//! handle shared between threads needs a `Mutex` around it. Two handles on
//! the same path share nothing; each notices the other's writes through its
//! own signature checks.
//!
//! # Examples
//!
//! ```
//! use paved_path::PathHandle;
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut handle = PathHandle::new(dir.path().join("config.json")).unwrap();
//!
//! handle.write(&json!({"a": 1})).unwrap();
//! assert_eq!(handle.read().unwrap(), json!({"a": 1}));
//! assert_eq!(handle.stats().reads, 0);
//! ```

mod atomic;
mod builder;
#[cfg(all(test, feature = "property-tests"))]
mod proptests;
pub mod signature;
mod state;
mod stats;

use std::cell::Cell;
use std::fs::{self, File, Metadata};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::codec::{Codec, CodecRegistry};
use crate::config::{HandleConfig, SignatureMode, Validation};
use crate::error::{Error, Result};
use crate::path::normalize::normalize;

pub use builder::HandleBuilder;
pub use signature::Signature;
pub use state::CacheState;
pub use stats::IoStats;

use state::{CacheEntry, Slot};

/// Name reported in decode errors from [`PathHandle::read_text`].
const UTF8: &str = "utf-8";

/// A filesystem path bound to a cached, decoded view of its contents.
#[derive(Debug)]
pub struct PathHandle {
    path: PathBuf,
    codec: Codec,
    config: HandleConfig,
    slot: Slot,
    stats: Cell<IoStats>,
}

impl PathHandle {
    /// Wraps `path` with the default codecs and settings.
    ///
    /// The path is normalized to absolute form; the file need not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path cannot be normalized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path.as_ref()).build()
    }

    /// Starts a [`HandleBuilder`] for `path`.
    pub fn builder(path: impl Into<PathBuf>) -> HandleBuilder {
        HandleBuilder::new(path)
    }

    pub(crate) fn from_parts(
        path: &Path,
        registry: &CodecRegistry,
        config: HandleConfig,
    ) -> Result<Self> {
        let path = normalize(path)?;
        let codec = match &config.codec {
            Some(key) => registry.resolve(key),
            None => registry.resolve(&path),
        };
        log::debug!("opened handle {} (codec {})", path.display(), codec.name());

        Ok(Self {
            path,
            codec,
            config,
            slot: Slot::Empty,
            stats: Cell::new(IoStats::default()),
        })
    }

    /// The normalized absolute path this handle mirrors.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The codec used by [`read`](Self::read) and [`write`](Self::write).
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// The handle's settings.
    #[must_use]
    pub fn config(&self) -> &HandleConfig {
        &self.config
    }

    /// Disk work done so far.
    #[must_use]
    pub fn stats(&self) -> IoStats {
        self.stats.get()
    }

    /// Cache state as of the last operation. Does not touch the disk.
    #[must_use]
    pub fn state(&self) -> CacheState {
        self.slot.state()
    }

    /// Signature recorded when the cache was populated.
    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        self.slot.entry().map(|entry| entry.signature)
    }

    /// Whether the file currently exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Returns the decoded contents, reading the file only if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the file is missing and no default value is
    ///   configured. With a default, that value is returned and nothing is
    ///   cached.
    /// - [`Error::Decode`] if the codec rejects the bytes. The bytes stay
    ///   cached, so retrying does not re-read an unchanged file.
    /// - [`Error::Io`] for other read failures.
    pub fn read(&mut self) -> Result<Value> {
        if let Err(err) = self.ensure_loaded() {
            if let (true, Some(default)) = (err.is_not_found(), &self.config.default_value) {
                log::debug!("{} missing, using default value", self.path.display());
                return Ok(default.clone());
            }
            return Err(err);
        }

        let codec = &self.codec;
        let path = &self.path;
        let entry = self.slot.fresh_mut().ok_or_else(|| Error::NotFound {
            path: path.clone(),
        })?;

        if let Some(value) = &entry.value {
            return Ok(value.clone());
        }
        let value = codec.decode(&entry.bytes).map_err(|source| Error::Decode {
            path: path.clone(),
            codec: codec.name().to_string(),
            source,
        })?;
        entry.value = Some(value.clone());
        Ok(value)
    }

    /// Returns the contents as UTF-8 text, sharing the cache with `read`.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read), with [`Error::Decode`] for invalid UTF-8.
    pub fn read_text(&mut self) -> Result<String> {
        self.ensure_loaded()?;

        let path = &self.path;
        let entry = self.slot.fresh_mut().ok_or_else(|| Error::NotFound {
            path: path.clone(),
        })?;

        if let Some(text) = &entry.text {
            return Ok(text.clone());
        }
        let text = std::str::from_utf8(&entry.bytes)
            .map_err(|e| Error::Decode {
                path: path.clone(),
                codec: UTF8.to_string(),
                source: Box::new(e),
            })?
            .to_owned();
        entry.text = Some(text.clone());
        Ok(text)
    }

    /// Returns the raw contents, sharing the cache with `read`.
    ///
    /// The returned buffer is a snapshot: later reloads replace the cache
    /// without affecting it.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] or [`Error::Io`] if the file cannot be read.
    pub fn read_bytes(&mut self) -> Result<Arc<[u8]>> {
        self.ensure_loaded()?;
        self.slot
            .entry()
            .map(|entry| Arc::clone(&entry.bytes))
            .ok_or_else(|| Error::NotFound {
                path: self.path.clone(),
            })
    }

    /// Deserializes the contents into `T`.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read); a shape mismatch is reported as
    /// [`Error::Decode`].
    pub fn read_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self.read()?;
        serde_json::from_value(value).map_err(|e| Error::Decode {
            path: self.path.clone(),
            codec: self.codec.name().to_string(),
            source: Box::new(e),
        })
    }

    /// Drops the cache and reads the file again.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub fn reload(&mut self) -> Result<Value> {
        self.invalidate();
        self.read()
    }

    /// Reads and decodes the file without consulting or updating the cache.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read), except that no default value is applied.
    pub fn read_uncached(&self) -> Result<Value> {
        let (bytes, _) = self.read_from_disk()?;
        self.codec.decode(&bytes).map_err(|source| Error::Decode {
            path: self.path.clone(),
            codec: self.codec.name().to_string(),
            source,
        })
    }

    /// Encodes `value` and writes it atomically.
    ///
    /// On success the cache holds the written bytes (or is cleared when
    /// write-through is off). On failure the cache is left as it was.
    ///
    /// # Errors
    ///
    /// [`Error::Encode`] if the codec rejects the value, [`Error::Write`] if
    /// the file could not be replaced.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        let bytes = self.codec.encode(value).map_err(|source| Error::Encode {
            path: self.path.clone(),
            codec: self.codec.name().to_string(),
            source,
        })?;
        self.write_entry(bytes, None)
    }

    /// Serializes `value` and writes it through the codec.
    ///
    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub fn write_as<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::Encode {
            path: self.path.clone(),
            codec: self.codec.name().to_string(),
            source: Box::new(e),
        })?;
        self.write(&value)
    }

    /// Writes `text` verbatim, bypassing the codec.
    ///
    /// # Errors
    ///
    /// [`Error::Write`] if the file could not be replaced.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.write_entry(text.as_bytes().to_vec(), Some(text.to_owned()))
    }

    /// Writes `bytes` verbatim, bypassing the codec.
    ///
    /// # Errors
    ///
    /// [`Error::Write`] if the file could not be replaced.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_entry(bytes.to_vec(), None)
    }

    /// Forgets the cached contents. The next read goes to disk.
    pub fn invalidate(&mut self) {
        if self.slot.state().is_populated() {
            log::debug!("invalidated {}", self.path.display());
        }
        self.slot = Slot::Empty;
    }

    /// Whether the file differs from the cache, is missing, or nothing is
    /// cached.
    ///
    /// Costs a stat call; in content-hash mode, also a read of the file when
    /// mtime and size still match. Never changes the cache.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        match self.slot.entry() {
            Some(entry) => self.differs_from_disk(&entry.signature),
            None => true,
        }
    }

    /// Probes the file and moves a `Fresh` cache to `Stale` if it changed.
    pub fn refresh_state(&mut self) -> CacheState {
        let changed = match &self.slot {
            Slot::Fresh(entry) => self.differs_from_disk(&entry.signature),
            Slot::Empty | Slot::Stale(_) => false,
        };
        if changed {
            log::debug!("{} changed on disk", self.path.display());
            self.slot.mark_stale();
        }
        self.slot.state()
    }

    /// Deletes the file and clears the cache.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file does not exist, [`Error::Io`] for
    /// other failures. The cache is cleared either way.
    pub fn remove(&mut self) -> Result<()> {
        self.invalidate();
        fs::remove_file(&self.path).map_err(|e| Error::from_io(&self.path, e))
    }

    fn bump(&self, update: impl FnOnce(&mut IoStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Makes the slot `Fresh` with bytes matching the file, reading if needed.
    fn ensure_loaded(&mut self) -> Result<()> {
        let needs_load = match &self.slot {
            Slot::Empty | Slot::Stale(_) => true,
            Slot::Fresh(entry) => {
                self.config.validation == Validation::Always
                    && self.differs_from_disk(&entry.signature)
            }
        };

        if !needs_load {
            log::trace!("cache hit for {}", self.path.display());
            return Ok(());
        }

        match self.read_from_disk() {
            Ok((bytes, signature)) => {
                log::debug!("loaded {} ({} bytes)", self.path.display(), bytes.len());
                self.slot = Slot::Fresh(CacheEntry::new(bytes.into(), signature));
                Ok(())
            }
            Err(err) => {
                if err.is_not_found() {
                    self.slot = Slot::Empty;
                }
                Err(err)
            }
        }
    }

    /// One full read: the signature is taken from the open file before its
    /// contents, so a concurrent change shows up as a mismatch later.
    fn read_from_disk(&self) -> Result<(Vec<u8>, Signature)> {
        let io_error = |e: io::Error| Error::from_io(&self.path, e);

        let mut file = File::open(&self.path).map_err(io_error)?;
        let meta = file.metadata().map_err(io_error)?;
        let mut bytes = Vec::with_capacity(usize::try_from(meta.len()).unwrap_or_default());
        file.read_to_end(&mut bytes).map_err(io_error)?;
        self.bump(|s| s.reads += 1);

        let mut signature = Signature::from_metadata(&meta);
        if self.config.signature == SignatureMode::ContentHash {
            signature = signature.with_digest(&bytes);
        }
        Ok((bytes, signature))
    }

    fn differs_from_disk(&self, recorded: &Signature) -> bool {
        self.bump(|s| s.probes += 1);
        let current = match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Signature::from_metadata(&meta),
            _ => return true,
        };
        if !current.same_stat(recorded) {
            return true;
        }
        if self.config.signature == SignatureMode::MtimeSize {
            return false;
        }

        self.bump(|s| s.digests += 1);
        match fs::read(&self.path) {
            Ok(bytes) => recorded.digest() != Some(signature::digest(&bytes)),
            Err(_) => true,
        }
    }

    /// Persists `bytes` and updates the cache from what was written.
    fn write_entry(&mut self, bytes: Vec<u8>, text: Option<String>) -> Result<()> {
        let file = atomic::write_atomic(&self.path, &bytes, self.config.create_parents)?;
        self.bump(|s| s.writes += 1);

        let meta = file.metadata().or_else(|_| fs::metadata(&self.path));
        drop(file);
        self.adopt_written(bytes, text, meta);
        Ok(())
    }

    /// Replaces the cache after the file now holds `bytes`.
    ///
    /// Without a stat of the new file there is no signature to record, so the
    /// cache is cleared; the write itself has already succeeded.
    fn adopt_written(
        &mut self,
        bytes: Vec<u8>,
        text: Option<String>,
        meta: io::Result<Metadata>,
    ) {
        log::debug!("wrote {} ({} bytes)", self.path.display(), bytes.len());
        if !self.config.write_through {
            self.slot = Slot::Empty;
            return;
        }

        let meta = match meta {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!(
                    "wrote {} but could not stat it, clearing cache: {e}",
                    self.path.display()
                );
                self.slot = Slot::Empty;
                return;
            }
        };

        let mut signature = Signature::from_metadata(&meta);
        if self.config.signature == SignatureMode::ContentHash {
            signature = signature.with_digest(&bytes);
        }
        let mut entry = CacheEntry::new(bytes.into(), signature);
        entry.text = text;
        self.slot = Slot::Fresh(entry);
    }
}
