//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `PAVED_PATH_*` environment variables
//! that override programmatic defaults.

use std::env;

use crate::config::schema::{HandleConfig, SignatureMode, Validation};
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use paved_path::config::{EnvironmentConfig, HandleConfig};
///
/// let mut config = HandleConfig::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Recognized variables:
    /// - `PAVED_PATH_SIGNATURE`: `mtime` or `hash`
    /// - `PAVED_PATH_VALIDATION`: `always` or `never`
    /// - `PAVED_PATH_WRITE_THROUGH`: boolean
    /// - `PAVED_PATH_CREATE_PARENTS`: boolean
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid.
    pub fn apply_overrides(config: &mut HandleConfig) -> Result<()> {
        if let Ok(val) = env::var("PAVED_PATH_SIGNATURE") {
            config.signature =
                SignatureMode::parse(&val).map_err(|message| Error::Validation {
                    field: "PAVED_PATH_SIGNATURE".into(),
                    message,
                })?;
        }

        if let Ok(val) = env::var("PAVED_PATH_VALIDATION") {
            config.validation = Validation::parse(&val).map_err(|message| Error::Validation {
                field: "PAVED_PATH_VALIDATION".into(),
                message,
            })?;
        }

        if let Ok(val) = env::var("PAVED_PATH_WRITE_THROUGH") {
            config.write_through = Self::parse_bool("PAVED_PATH_WRITE_THROUGH", &val)?;
        }

        if let Ok(val) = env::var("PAVED_PATH_CREATE_PARENTS") {
            config.create_parents = Self::parse_bool("PAVED_PATH_CREATE_PARENTS", &val)?;
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
