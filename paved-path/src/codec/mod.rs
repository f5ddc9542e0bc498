//! Codecs and the registry that selects them.
//!
//! A [`Codec`] is a pair of pure functions turning a [`Value`] into bytes and
//! back. A [`CodecRegistry`] maps file-type keys (extensions such as `json`
//! or tags such as `text`) to codecs. Registries are ordinary values: build
//! one, register what you need, and hand it to the handles that should use
//! it. There is no process-wide registry.
//!
//! # Examples
//!
//! ```
//! use paved_path::codec::CodecRegistry;
//!
//! let registry = CodecRegistry::with_defaults();
//! assert_eq!(registry.resolve("config.JSON").name(), "json");
//! assert_eq!(registry.resolve("notes.unknown").name(), "text");
//! ```

pub mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

/// Error type returned by codec functions.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Serializer half of a codec.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync>;

/// Deserializer half of a codec.
pub type DeserializeFn = Arc<dyn Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync>;

/// A named serialize/deserialize pair bound to a file type.
///
/// Cloning a codec is cheap; both functions are reference counted.
#[derive(Clone)]
pub struct Codec {
    name: Arc<str>,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
}

impl Codec {
    /// Creates a codec from a name and its two functions.
    pub fn new<S, D>(name: &str, serialize: S, deserialize: D) -> Self
    where
        S: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// The codec's name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializes a value to bytes.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the value cannot be represented.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        (self.serialize)(value)
    }

    /// Parses bytes into a value.
    ///
    /// # Errors
    ///
    /// Returns the parser's error if the bytes are malformed.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        (self.deserialize)(bytes)
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").field("name", &self.name).finish()
    }
}

/// Maps file-type keys to codecs.
///
/// Keys are case-insensitive and a leading `.` is ignored, so `".JSON"`,
/// `"json"` and `"Json"` all name the same entry.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Codec>,
    fallback: Codec,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CodecRegistry {
    /// Creates a registry with no entries; every lookup yields the text codec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
            fallback: builtin::text(),
        }
    }

    /// Creates a registry with the built-in codecs.
    ///
    /// Registers `txt`/`text`, `json`, `toml` and, when the `yaml` feature is
    /// enabled, `yaml`/`yml`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let text = builtin::text();
        registry.register_codec("txt", text.clone());
        registry.register_codec("text", text);
        registry.register_codec("json", builtin::json());
        registry.register_codec("toml", builtin::toml());

        #[cfg(feature = "yaml")]
        {
            let yaml = builtin::yaml();
            registry.register_codec("yaml", yaml.clone());
            registry.register_codec("yml", yaml);
        }

        registry
    }

    /// Adds or replaces the codec for `type_key` from a pair of functions.
    ///
    /// The last registration for a key wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use paved_path::codec::CodecRegistry;
    /// use serde_json::Value;
    ///
    /// let mut registry = CodecRegistry::new();
    /// registry.register(
    ///     "upper",
    ///     |value: &Value| Ok(value.as_str().unwrap_or_default().to_uppercase().into_bytes()),
    ///     |bytes: &[u8]| Ok(Value::String(String::from_utf8(bytes.to_vec())?)),
    /// );
    /// assert_eq!(registry.resolve("shout.UPPER").name(), "upper");
    /// ```
    pub fn register<S, D>(&mut self, type_key: &str, serialize: S, deserialize: D)
    where
        S: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let key = normalize_key(type_key);
        let codec = Codec::new(&key, serialize, deserialize);
        self.codecs.insert(key, codec);
    }

    /// Adds or replaces the codec for `type_key` with an existing codec.
    pub fn register_codec(&mut self, type_key: &str, codec: Codec) {
        self.codecs.insert(normalize_key(type_key), codec);
    }

    /// Looks up a codec by key without falling back.
    #[must_use]
    pub fn get(&self, type_key: &str) -> Option<&Codec> {
        self.codecs.get(&normalize_key(type_key))
    }

    /// Resolves a path or a bare type key to a codec.
    ///
    /// The path's extension is tried first (case-insensitive), then the whole
    /// string as a key. Unknown types resolve to the plain-text codec; this
    /// never fails.
    pub fn resolve(&self, path_or_key: impl AsRef<Path>) -> Codec {
        let target = path_or_key.as_ref();

        let by_extension = target
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get(ext));
        if let Some(codec) = by_extension {
            return codec.clone();
        }

        if let Some(codec) = target.to_str().and_then(|key| self.get(key)) {
            return codec.clone();
        }

        log::trace!(
            "no codec registered for {}, using {}",
            target.display(),
            self.fallback.name()
        );
        self.fallback.clone()
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches('.').to_lowercase()
}
