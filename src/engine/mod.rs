//! Engine boundary - the only wire-facing seam of the crate.
//!
//! An [`Engine`] accepts a [`Submission`] together with a fresh
//! [`CompletionSlot`] and, at some later point, completes the slot exactly once
//! with either a response payload or an [`EngineErrorCode`].
//!
//! ```text
//! execute ─► JsonCodec ─► Engine::submit(submission, slot) ─┐
//!    ▲                                                      │ (async)
//!    └──── JsonCodec ◄── CompletionReceiver ◄── slot.succeed / slot.fail
//! ```
//!
//! Implementations:
//! - [`FramedEngine`] - an engine process reached over any async byte stream
//! - anything else implementing [`Engine`] (tests use in-memory engines)

mod completion;
mod framed;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::Session;

pub use completion::{Completion, CompletionReceiver, CompletionSlot};
pub use framed::{FramedEngine, FramedEngineConfig};

/// The external execution engine.
///
/// `submit` is fire-and-forget: it must not block, and it must arrange for the
/// slot to be completed once, from any thread or task.
pub trait Engine: Send + Sync + 'static {
    /// Hand a request to the engine.
    fn submit(&self, submission: Submission, slot: CompletionSlot);
}

/// Opaque correlation context tying one submission to one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub u64);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the engine receives for one call.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Correlation context of this call.
    pub correlation: CorrelationId,
    /// The encoded request (UTF-8 JSON text).
    pub payload: String,
    /// Session state of the submitting client.
    pub session: Session,
}

/// Failure codes reported by the engine.
///
/// The raw values are part of the engine contract. Codes this version does
/// not know are kept as [`EngineErrorCode::Unrecognized`] and are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineErrorCode {
    /// Reserved success code; never a valid failure.
    Ok,
    /// The request timed out inside the engine.
    TimedOut,
    /// The engine could not reach the ledger.
    Transport,
    /// The ledger answered with something the engine could not read.
    MalformedResponse,
    /// The ledger rejected the request at pre-check.
    PreCheckRejected,
    /// The payment attached to a query was rejected.
    QueryPaymentRejected,
    /// The engine failed to parse a value.
    BasicParse,
    /// The engine failed to parse a key.
    KeyParse,
    /// Neither a payer account nor a transaction ID was available.
    NoPayerAccountOrTransactionId,
    /// The query costs more than the allowed maximum payment.
    MaxQueryPaymentExceeded,
    /// A node account ID is not known to the engine.
    NodeAccountUnknown,
    /// The ledger answered with a status the engine does not know.
    ResponseStatusUnrecognized,
    /// A receipt carried a failing status.
    ReceiptStatus,
    /// Signing failed.
    Signature,
    /// The engine could not parse the submitted request payload.
    RequestParse,
    /// Bytes handed to a binary codec entry point are malformed.
    MalformedBytes,
    /// The connection to the engine closed before a response arrived.
    ConnectionClosed,
    /// A code this version of the crate does not know.
    Unrecognized(i32),
}

impl EngineErrorCode {
    /// Interpret a raw engine code.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            1 => Self::TimedOut,
            2 => Self::Transport,
            3 => Self::MalformedResponse,
            4 => Self::PreCheckRejected,
            5 => Self::QueryPaymentRejected,
            6 => Self::BasicParse,
            7 => Self::KeyParse,
            8 => Self::NoPayerAccountOrTransactionId,
            9 => Self::MaxQueryPaymentExceeded,
            10 => Self::NodeAccountUnknown,
            11 => Self::ResponseStatusUnrecognized,
            12 => Self::ReceiptStatus,
            13 => Self::Signature,
            14 => Self::RequestParse,
            15 => Self::MalformedBytes,
            16 => Self::ConnectionClosed,
            other => Self::Unrecognized(other),
        }
    }

    /// The raw engine code.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::TimedOut => 1,
            Self::Transport => 2,
            Self::MalformedResponse => 3,
            Self::PreCheckRejected => 4,
            Self::QueryPaymentRejected => 5,
            Self::BasicParse => 6,
            Self::KeyParse => 7,
            Self::NoPayerAccountOrTransactionId => 8,
            Self::MaxQueryPaymentExceeded => 9,
            Self::NodeAccountUnknown => 10,
            Self::ResponseStatusUnrecognized => 11,
            Self::ReceiptStatus => 12,
            Self::Signature => 13,
            Self::RequestParse => 14,
            Self::MalformedBytes => 15,
            Self::ConnectionClosed => 16,
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) => write!(f, "unrecognized engine code {raw}"),
            known => write!(f, "{known:?} (code {})", known.as_raw()),
        }
    }
}

impl Serialize for EngineErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for EngineErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(Self::from_raw)
    }
}
