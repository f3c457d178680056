//! Execution bridge.
//!
//! Turns one request into one engine submission and suspends the caller until
//! the engine completes the call's slot:
//!
//! ```text
//! Constructed ─► Submitted ─► Completed(Success | Failure) ─► Resolved
//! ```
//!
//! Encoding happens before anything reaches the engine, so an encode failure
//! never submits. A success payload is decoded as the caller's declared type;
//! a failure code is mapped into [`Error`] without decoding anything. There is
//! no timeout and no retry: one call is exactly one submission.
//!
//! Dropping the returned future abandons the call. The engine still owns the
//! slot and may complete it later; that completion is discarded.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::codec::JsonCodec;
use crate::engine::{Completion, CompletionSlot, CorrelationId, Submission};
use crate::error::{Error, Result};
use crate::request::{self, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallState {
    Constructed,
    Submitted,
    Completed(Outcome),
    Resolved,
}

/// Bookkeeping for one call: its correlation, state, and output type.
struct PendingOperation<T> {
    correlation: CorrelationId,
    state: CallState,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> PendingOperation<T> {
    fn new(correlation: CorrelationId) -> Self {
        Self {
            correlation,
            state: CallState::Constructed,
            _output: PhantomData,
        }
    }

    fn advance(&mut self, next: CallState) {
        tracing::trace!("{}: {:?} -> {:?}", self.correlation, self.state, next);
        self.state = next;
    }

    /// Settle the call from what the slot delivered.
    fn resolve(&mut self, completion: Completion) -> Result<T> {
        let result = match completion {
            Completion::Success(text) => {
                self.advance(CallState::Completed(Outcome::Success));
                JsonCodec::decode(&text)
            }
            Completion::Failure(code) => {
                self.advance(CallState::Completed(Outcome::Failure));
                tracing::debug!("{} failed in engine: {}", self.correlation, code);
                Err(Error::from_engine_code(code))
            }
        };

        self.advance(CallState::Resolved);
        result
    }
}

pub(crate) async fn execute<T, R>(client: &Client, request: &R) -> Result<T>
where
    T: DeserializeOwned,
    R: Request + ?Sized,
{
    let payload = request::encode(request)?;

    let correlation = client.next_correlation();
    let mut operation = PendingOperation::<T>::new(correlation);
    let _in_flight = client.track_in_flight();

    let (slot, receiver) = CompletionSlot::with_monitor(correlation, client.violation_monitor());

    tracing::debug!("Submitting {} as {}", request.kind(), correlation);
    client.engine().submit(
        Submission {
            correlation,
            payload,
            session: client.session(),
        },
        slot,
    );
    operation.advance(CallState::Submitted);

    match receiver.wait().await {
        Ok(completion) => operation.resolve(completion),
        Err(e) => {
            operation.advance(CallState::Resolved);
            Err(e)
        }
    }
}
