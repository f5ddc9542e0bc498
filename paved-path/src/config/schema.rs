//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a handle fingerprints the file it mirrors.
///
/// # Examples
///
/// ```
/// use paved_path::config::SignatureMode;
///
/// assert_eq!(SignatureMode::parse("hash").unwrap(), SignatureMode::ContentHash);
/// assert_eq!(SignatureMode::default().to_string(), "mtime");
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureMode {
    /// Modification time plus byte size, from a single stat call.
    #[default]
    MtimeSize,
    /// Modification time plus size, then a content hash when those match.
    ///
    /// Catches rewrites that land within the same mtime tick and keep the
    /// size, at the cost of reading the file on every validation.
    ContentHash,
}

impl SignatureMode {
    /// Parses `mtime`/`mtime-size` or `hash`/`content-hash` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mtime" | "mtime-size" => Ok(Self::MtimeSize),
            "hash" | "content-hash" => Ok(Self::ContentHash),
            _ => Err(format!("invalid signature mode: {s}")),
        }
    }
}

impl std::fmt::Display for SignatureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MtimeSize => write!(f, "mtime"),
            Self::ContentHash => write!(f, "hash"),
        }
    }
}

/// When a cached read checks the file on disk.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Probe the signature on every read.
    #[default]
    Always,
    /// Trust the cache until it is invalidated or reloaded.
    Never,
}

impl Validation {
    /// Parses `always` or `never` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(format!("invalid validation policy: {s}")),
        }
    }
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

/// Per-handle settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HandleConfig {
    /// How the file is fingerprinted.
    pub signature: SignatureMode,

    /// When reads re-check the file.
    pub validation: Validation,

    /// Adopt written content as the cache (true) or clear the cache (false).
    pub write_through: bool,

    /// Create missing parent directories before writing.
    pub create_parents: bool,

    /// Value returned by `read` when the file does not exist.
    pub default_value: Option<Value>,

    /// Codec key that overrides extension-based lookup.
    pub codec: Option<String>,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            signature: SignatureMode::default(),
            validation: Validation::default(),
            write_through: true,
            create_parents: true,
            default_value: None,
            codec: None,
        }
    }
}
