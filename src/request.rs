//! The request contract shared by every query and transaction.
//!
//! A request contributes two JSON objects: its variant fields (tagged with
//! `"$type"`) and the base fields shared by its kind. [`encode`] merges them
//! into one payload in a fixed order: variant fields first, then base fields.
//! A key present in both is an [`Error::Encode`]; neither side silently
//! overwrites the other.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::codec::JsonCodec;
use crate::error::{Error, Result};

/// A request that can be submitted to the engine.
pub trait Request {
    /// The type a successful response payload decodes into.
    type Response: DeserializeOwned;

    /// The wire tag of this request (`"tokenWipe"`, `"contractInfo"`, ...).
    fn kind(&self) -> &'static str;

    /// The variant's own fields, including the `"$type"` tag.
    fn variant_contribution(&self) -> Result<Map<String, Value>>;

    /// Fields shared by every request of this kind.
    fn base_contribution(&self) -> Result<Map<String, Value>>;
}

/// Encode a request into its wire payload.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a contribution cannot be serialized or if the
/// two contributions share a key.
pub fn encode<R: Request + ?Sized>(request: &R) -> Result<String> {
    let mut payload = request.variant_contribution()?;

    for (key, value) in request.base_contribution()? {
        if payload.contains_key(&key) {
            return Err(Error::Encode(format!(
                "`{key}` is set by both the {} fields and the shared request fields",
                request.kind()
            )));
        }
        payload.insert(key, value);
    }

    JsonCodec::encode(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed {
        variant: Value,
        base: Value,
    }

    fn object(value: &Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    impl Request for Fixed {
        type Response = Value;

        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn variant_contribution(&self) -> Result<Map<String, Value>> {
            Ok(object(&self.variant))
        }

        fn base_contribution(&self) -> Result<Map<String, Value>> {
            Ok(object(&self.base))
        }
    }

    #[test]
    fn test_variant_fields_come_first() {
        let request = Fixed {
            variant: json!({"$type": "fixed", "tokenId": "0.0.1"}),
            base: json!({"transactionMemo": "m"}),
        };

        assert_eq!(
            encode(&request).unwrap(),
            r#"{"$type":"fixed","tokenId":"0.0.1","transactionMemo":"m"}"#
        );
    }

    #[test]
    fn test_empty_base_adds_nothing() {
        let request = Fixed {
            variant: json!({"$type": "fixed"}),
            base: json!({}),
        };

        assert_eq!(encode(&request).unwrap(), r#"{"$type":"fixed"}"#);
    }

    #[test]
    fn test_collision_is_encode_error() {
        let request = Fixed {
            variant: json!({"$type": "fixed", "payment": 1}),
            base: json!({"payment": {"amount": 2}}),
        };

        let err = encode(&request).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(err.to_string().contains("`payment`"));
    }
}
