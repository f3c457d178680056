//! MsgPack codec using `rmp-serde`.
//!
//! **Always use `to_vec_named`, never `to_vec`.** Structs must be written as
//! maps (with field names), not as positional arrays: the engine side decodes
//! by name, and a positional layout breaks as soon as a field is added.
//!
//! # Example
//!
//! ```
//! use ledger_sdk::codec::MsgPackCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     content: String,
//! }
//!
//! let msg = Message { id: 42, content: "hello".to_string() };
//! let encoded = MsgPackCodec::encode(&msg).unwrap();
//! let decoded: Message = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use crate::error::{Error, Result};

/// MessagePack codec for binary layouts.
///
/// Uses `rmp_serde::to_vec_named` so structs are serialized as maps.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        // to_vec_named, NOT to_vec
        rmp_serde::to_vec_named(value).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes cannot be deserialized to `T`.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Envelope {
        correlation: u64,
        request: String,
        payer: Option<String>,
    }

    #[test]
    fn test_encode_decode_struct() {
        let original = Envelope {
            correlation: 7,
            request: r#"{"$type":"tokenPause"}"#.to_string(),
            payer: Some("0.0.2".to_string()),
        };

        let encoded = MsgPackCodec::encode(&original).unwrap();
        let decoded: Envelope = MsgPackCodec::decode(&encoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_to_vec_named_produces_map_format() {
        let envelope = Envelope {
            correlation: 1,
            request: "x".to_string(),
            payer: None,
        };

        let encoded = MsgPackCodec::encode(&envelope).unwrap();

        // fixmap with 3 elements is 0x83, fixarray would be 0x93
        assert_eq!(encoded[0], 0x83, "Expected fixmap, got {:02X}", encoded[0]);
    }

    #[test]
    fn test_none_encodes_as_nil() {
        let val: Option<String> = None;
        let encoded = MsgPackCodec::encode(&val).unwrap();
        assert_eq!(encoded, vec![0xc0], "None should encode as msgpack nil");

        let decoded: Option<String> = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_u64_max_survives() {
        let encoded = MsgPackCodec::encode(&u64::MAX).unwrap();
        let decoded: u64 = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, u64::MAX);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let invalid = b"not valid msgpack";
        let result: Result<Envelope> = MsgPackCodec::decode(invalid);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_error_on_truncated_data() {
        let encoded = MsgPackCodec::encode(&Envelope {
            correlation: 1,
            request: "payload".to_string(),
            payer: None,
        })
        .unwrap();

        let result: Result<Envelope> = MsgPackCodec::decode(&encoded[..encoded.len() - 3]);
        assert!(result.is_err());
    }
}
