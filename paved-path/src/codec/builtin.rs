//! Built-in codecs: plain text, JSON, TOML and (optionally) YAML.

use serde_json::Value;

use super::{Codec, CodecError};

/// Plain UTF-8 text.
///
/// Decoding yields a [`Value::String`]. Only strings can be encoded; they are
/// written verbatim.
#[must_use]
pub fn text() -> Codec {
    Codec::new("text", encode_text, decode_text)
}

/// JSON via `serde_json`, pretty-printed on write.
#[must_use]
pub fn json() -> Codec {
    Codec::new("json", encode_json, decode_json)
}

/// TOML via the `toml` crate. Only tables can be written.
#[must_use]
pub fn toml() -> Codec {
    Codec::new("toml", encode_toml, decode_toml)
}

/// YAML via `serde_yaml`.
#[cfg(feature = "yaml")]
#[must_use]
pub fn yaml() -> Codec {
    Codec::new("yaml", encode_yaml, decode_yaml)
}

fn encode_text(value: &Value) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        _ => Err("the text codec can only write strings".into()),
    }
}

fn decode_text(bytes: &[u8]) -> Result<Value, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(Value::String(text.to_owned()))
}

fn encode_json(value: &Value) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec_pretty(value)?)
}

fn decode_json(bytes: &[u8]) -> Result<Value, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn encode_toml(value: &Value) -> Result<Vec<u8>, CodecError> {
    if !value.is_object() {
        return Err("TOML documents must be tables at the top level".into());
    }
    Ok(toml::to_string_pretty(value)?.into_bytes())
}

fn decode_toml(bytes: &[u8]) -> Result<Value, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(toml::from_str(text)?)
}

#[cfg(feature = "yaml")]
fn encode_yaml(value: &Value) -> Result<Vec<u8>, CodecError> {
    Ok(serde_yaml::to_string(value)?.into_bytes())
}

#[cfg(feature = "yaml")]
fn decode_yaml(bytes: &[u8]) -> Result<Value, CodecError> {
    Ok(serde_yaml::from_slice(bytes)?)
}
