//! Builder for [`PathHandle`].

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::codec::CodecRegistry;
use crate::config::{EnvironmentConfig, HandleConfig, SignatureMode, Validation};
use crate::error::Result;
use crate::handle::PathHandle;

/// Assembles a [`PathHandle`] from a path, a codec registry and settings.
///
/// Precedence, highest first: individual setters, environment variables
/// (only when [`HandleBuilder::with_env`] is called), the base config.
///
/// # Examples
///
/// ```
/// use paved_path::config::SignatureMode;
/// use paved_path::PathHandle;
/// use serde_json::json;
///
/// let handle = PathHandle::builder("settings.conf")
///     .codec("json")
///     .signature(SignatureMode::ContentHash)
///     .default_value(json!({}))
///     .build()
///     .unwrap();
///
/// assert_eq!(handle.codec().name(), "json");
/// assert_eq!(handle.config().signature, SignatureMode::ContentHash);
/// ```
#[derive(Debug)]
#[must_use]
pub struct HandleBuilder {
    path: PathBuf,
    registry: Option<Arc<CodecRegistry>>,
    config: HandleConfig,
    overrides: Overrides,
    use_env: bool,
}

#[derive(Debug, Default)]
struct Overrides {
    signature: Option<SignatureMode>,
    validation: Option<Validation>,
    write_through: Option<bool>,
    create_parents: Option<bool>,
    default_value: Option<Value>,
    codec: Option<String>,
}

impl HandleBuilder {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            registry: None,
            config: HandleConfig::default(),
            overrides: Overrides::default(),
            use_env: false,
        }
    }

    /// Uses `registry` instead of [`CodecRegistry::with_defaults`].
    pub fn registry(mut self, registry: Arc<CodecRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the base configuration.
    pub fn config(mut self, config: HandleConfig) -> Self {
        self.config = config;
        self
    }

    /// Applies `PAVED_PATH_*` environment overrides on top of the base config.
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Sets the signature mode.
    pub fn signature(mut self, signature: SignatureMode) -> Self {
        self.overrides.signature = Some(signature);
        self
    }

    /// Sets the validation policy.
    pub fn validation(mut self, validation: Validation) -> Self {
        self.overrides.validation = Some(validation);
        self
    }

    /// Sets whether writes populate the cache.
    pub fn write_through(mut self, enabled: bool) -> Self {
        self.overrides.write_through = Some(enabled);
        self
    }

    /// Sets whether writes create missing parent directories.
    pub fn create_parents(mut self, enabled: bool) -> Self {
        self.overrides.create_parents = Some(enabled);
        self
    }

    /// Value returned by `read` when the file is missing.
    pub fn default_value(mut self, value: Value) -> Self {
        self.overrides.default_value = Some(value);
        self
    }

    /// Forces a codec key instead of resolving by extension.
    pub fn codec(mut self, key: impl Into<String>) -> Self {
        self.overrides.codec = Some(key.into());
        self
    }

    /// Builds the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment override is invalid or the path
    /// cannot be normalized.
    pub fn build(self) -> Result<PathHandle> {
        let mut config = self.config;
        if self.use_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        let overrides = self.overrides;
        if let Some(signature) = overrides.signature {
            config.signature = signature;
        }
        if let Some(validation) = overrides.validation {
            config.validation = validation;
        }
        if let Some(write_through) = overrides.write_through {
            config.write_through = write_through;
        }
        if let Some(create_parents) = overrides.create_parents {
            config.create_parents = create_parents;
        }
        if overrides.default_value.is_some() {
            config.default_value = overrides.default_value;
        }
        if overrides.codec.is_some() {
            config.codec = overrides.codec;
        }

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(CodecRegistry::with_defaults()));

        PathHandle::from_parts(&self.path, &registry, config)
    }
}
