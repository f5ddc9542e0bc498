//! Configuration for path handles.
//!
//! A [`HandleConfig`] controls how a handle decides whether its cache is
//! still valid and what happens on writes. Values come from, in order of
//! precedence (highest first):
//!
//! 1. Programmatic settings (via `HandleBuilder` or struct literals)
//! 2. Environment variables (`PAVED_PATH_*`), when applied
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use paved_path::config::{HandleConfig, SignatureMode, Validation};
//!
//! let config = HandleConfig {
//!     signature: SignatureMode::ContentHash,
//!     ..Default::default()
//! };
//!
//! assert_eq!(config.validation, Validation::Always);
//! assert!(config.write_through);
//! ```

pub mod environment;
pub mod schema;

pub use environment::EnvironmentConfig;
pub use schema::{HandleConfig, SignatureMode, Validation};
