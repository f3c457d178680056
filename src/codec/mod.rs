//! Codec module - the wire codec between typed values and payloads.
//!
//! - [`JsonCodec`] - request/response payloads exchanged with the engine (UTF-8 JSON text)
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (`to_vec_named`), the byte layout
//!   behind the native binary codec and the framed engine envelope
//! - [`BinaryCodec`] - fixed binary entry points for byte-level value types
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects, so the
//! call site picks the output type and the codec never infers a shape from payload
//! content. The one trait here, [`BinaryCodec`], marks the engine boundary: an engine
//! may supply its own byte layout for value types.
//!
//! # Example
//!
//! ```
//! use ledger_sdk::codec::JsonCodec;
//!
//! let text = JsonCodec::encode(&vec![1u64, 2, 3]).unwrap();
//! assert_eq!(text, "[1,2,3]");
//! let decoded: Vec<u64> = JsonCodec::decode(&text).unwrap();
//! assert_eq!(decoded, vec![1, 2, 3]);
//! ```

mod binary;
mod json;
mod msgpack;

pub use binary::{BinaryCodec, NativeBinaryCodec, RawSemanticVersion};
pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
