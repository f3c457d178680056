//! Error types for ledger-sdk.
//!
//! Every failure surfaced by `execute`, `to_bytes` or `from_bytes` is one of
//! four kinds:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | [`Error::Encode`] | request state cannot be represented on the wire |
//! | [`Error::Submission`] | the engine rejected or failed the request |
//! | [`Error::Decode`] | a payload does not match the declared output shape |
//! | [`Error::ProtocolViolation`] | the engine broke the completion contract |
//!
//! The remaining variants belong to value parsing and to the framed engine
//! transport; the framed engine turns its own transport failures into
//! completion failures before they reach a caller of `execute`.

use thiserror::Error;

use crate::engine::EngineErrorCode;

/// Main error type for all ledger-sdk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A request's field state cannot be represented in the wire format.
    #[error("cannot encode request: {0}")]
    Encode(String),

    /// The engine reported the request as rejected or failed.
    #[error("engine rejected request: {code}")]
    Submission {
        /// Code reported by the engine.
        code: EngineErrorCode,
    },

    /// A payload does not match the caller's declared output type.
    #[error("cannot decode payload: {0}")]
    Decode(String),

    /// The engine broke the exactly-once completion contract.
    #[error("engine protocol violation: {0}")]
    ProtocolViolation(String),

    /// A value type could not be parsed from its string form.
    #[error("failed to parse: {0}")]
    BasicParse(String),

    /// I/O error on the framed engine stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid frame on the framed engine stream.
    #[error("Frame error: {0}")]
    Protocol(String),

    /// Engine connection closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Backpressure timeout - write buffer full.
    #[error("Backpressure timeout")]
    BackpressureTimeout,
}

impl Error {
    /// Translate an engine failure code into this crate's error taxonomy.
    ///
    /// Unknown codes are never treated as success. The reserved "ok" code
    /// delivered as a failure is itself a protocol violation.
    pub fn from_engine_code(code: EngineErrorCode) -> Self {
        match code {
            EngineErrorCode::Ok => Error::ProtocolViolation(
                "engine signalled failure with the success code".to_string(),
            ),
            EngineErrorCode::MalformedBytes => {
                Error::Decode("engine could not decode the supplied bytes".to_string())
            }
            code => Error::Submission { code },
        }
    }

    /// Engine code carried by a [`Error::Submission`].
    pub fn engine_code(&self) -> Option<EngineErrorCode> {
        match self {
            Error::Submission { code } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error signals engine misbehavior rather than rejection.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Error::ProtocolViolation(_))
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_codes_map_to_submission() {
        let err = Error::from_engine_code(EngineErrorCode::PreCheckRejected);
        assert!(matches!(
            err,
            Error::Submission {
                code: EngineErrorCode::PreCheckRejected
            }
        ));
        assert_eq!(err.engine_code(), Some(EngineErrorCode::PreCheckRejected));
    }

    #[test]
    fn test_unrecognized_code_is_not_success() {
        let err = Error::from_engine_code(EngineErrorCode::Unrecognized(4242));
        assert_eq!(err.engine_code(), Some(EngineErrorCode::Unrecognized(4242)));
    }

    #[test]
    fn test_ok_code_as_failure_is_violation() {
        let err = Error::from_engine_code(EngineErrorCode::Ok);
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_malformed_bytes_is_decode() {
        let err = Error::from_engine_code(EngineErrorCode::MalformedBytes);
        assert!(matches!(err, Error::Decode(_)));
        assert!(!err.is_protocol_violation());
    }
}
