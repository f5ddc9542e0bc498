#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # paved-path
//!
//! Caching file handles that avoid redundant disk I/O.
//!
//! A [`PathHandle`] keeps the last-read (or last-written) contents of one file
//! in memory together with a [`Signature`] of the file. Repeated reads of an
//! unchanged file are served from memory; a changed file is re-read; writes
//! are atomic and refresh the cache without reading the file back.
//!
//! ## Core Types
//!
//! - [`PathHandle`] and [`HandleBuilder`]: the caching handle
//! - [`CodecRegistry`] and [`Codec`]: extension-keyed encoders and decoders
//! - [`PavedPath`] and [`IntoSegment`]: path building from typed segments
//! - [`HandleConfig`]: signature mode, validation policy, write behavior
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use paved_path::{PathHandle, PavedPath};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = PavedPath::new(dir.path()) / "runs" / 7_u32 / "config.json";
//!
//! let mut handle = path.handle().unwrap();
//! handle.write(&json!({"epochs": 10})).unwrap();
//!
//! assert_eq!(handle.read().unwrap()["epochs"], 10);
//! assert_eq!(handle.stats().reads, 0);
//! assert!(!handle.is_stale());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod handle;
pub mod logging;
pub mod path;

// Re-export key types at crate root for convenience
pub use codec::{Codec, CodecError, CodecRegistry};
pub use config::{HandleConfig, SignatureMode, Validation};
pub use error::{Error, Result};
pub use handle::{CacheState, HandleBuilder, IoStats, PathHandle, Signature};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{IntoSegment, PavedPath};
