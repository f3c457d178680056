//! JSON codec for engine payloads.
//!
//! Requests travel to the engine and responses come back as UTF-8 JSON text.
//!
//! Rules the codec relies on (enforced by the serde attributes on each type):
//!
//! - absent optional fields are skipped, never written as `null`
//! - field names are lowerCamelCase and match the builder property
//! - sequences keep their order
//! - `u32`/`u64` are written as JSON integers, never as floats
//! - object keys keep insertion order (`preserve_order`), so a merged request
//!   lists its variant fields before its base fields

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// JSON codec for request and response payloads.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to payload text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be represented.
    #[inline]
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Encode a value into a JSON object, the unit that request layers merge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be represented or does not
    /// serialize to an object.
    pub fn encode_object<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>> {
        match serde_json::to_value(value).map_err(|e| Error::Encode(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Encode(format!(
                "expected an object contribution, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Decode payload text into the caller's declared type.
    ///
    /// Missing required fields or wrongly shaped values fail; nothing is
    /// defaulted unless the type itself declares a default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the text is not JSON or does not match `T`.
    #[inline]
    pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| Error::Decode(e.to_string()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
