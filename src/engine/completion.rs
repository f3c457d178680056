//! Single-shot completion slot.
//!
//! One slot is created per `execute` call. The engine side holds the
//! [`CompletionSlot`] (the only producer), the suspended call holds the
//! [`CompletionReceiver`] (the only consumer). Underneath is a
//! `tokio::sync::oneshot` channel.
//!
//! The slot counts completion events. The first one is delivered; any later
//! one is rejected with [`Error::ProtocolViolation`], logged, and counted on the
//! owning client. If the receiver has not looked at the result yet, the call
//! itself also fails with the violation. A slot dropped by the engine without
//! any completion resolves the call with a violation too.
//!
//! Slot state lives behind an `Arc`, so completing a slot whose caller has
//! stopped waiting is safe: the result is discarded.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{CorrelationId, EngineErrorCode};
use crate::error::{Error, Result};

/// The outcome an engine delivers for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Response payload (UTF-8 JSON text).
    Success(String),
    /// The engine's failure code.
    Failure(EngineErrorCode),
}

struct SlotState {
    correlation: CorrelationId,
    sender: Mutex<Option<oneshot::Sender<Completion>>>,
    /// Completion events received so far.
    completions: AtomicU32,
    /// Violation counter of the owning client.
    violations: Arc<AtomicU64>,
}

/// Engine-facing end of a completion slot.
///
/// Cloning yields another handle to the same slot; the exactly-once rule
/// spans all clones.
#[derive(Clone)]
pub struct CompletionSlot {
    state: Arc<SlotState>,
}

impl CompletionSlot {
    /// Create a standalone slot and its receiver.
    pub fn channel(correlation: CorrelationId) -> (Self, CompletionReceiver) {
        Self::with_monitor(correlation, Arc::new(AtomicU64::new(0)))
    }

    /// Create a slot that reports violations to `violations`.
    pub(crate) fn with_monitor(
        correlation: CorrelationId,
        violations: Arc<AtomicU64>,
    ) -> (Self, CompletionReceiver) {
        let (tx, rx) = oneshot::channel();

        let state = Arc::new(SlotState {
            correlation,
            sender: Mutex::new(Some(tx)),
            completions: AtomicU32::new(0),
            violations,
        });

        let receiver = CompletionReceiver {
            rx,
            state: state.clone(),
        };

        (Self { state }, receiver)
    }

    /// Correlation context of the call this slot belongs to.
    #[inline]
    pub fn correlation(&self) -> CorrelationId {
        self.state.correlation
    }

    /// Whether a completion has already been delivered.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state.completions.load(Ordering::Acquire) > 0
    }

    /// Deliver the completion for this call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if the slot was already completed.
    pub fn complete(&self, completion: Completion) -> Result<()> {
        let previous = self.state.completions.fetch_add(1, Ordering::AcqRel);

        if previous > 0 {
            self.state.violations.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                "Completion slot {} fired {} times",
                self.state.correlation,
                previous + 1
            );
            return Err(Error::ProtocolViolation(format!(
                "completion slot {} fired more than once",
                self.state.correlation
            )));
        }

        let sender = self.state.sender.lock().take();
        if let Some(tx) = sender {
            if tx.send(completion).is_err() {
                tracing::debug!(
                    "Caller for {} stopped waiting, completion discarded",
                    self.state.correlation
                );
            }
        }

        Ok(())
    }

    /// Complete with a success payload.
    pub fn succeed(&self, payload: impl Into<String>) -> Result<()> {
        self.complete(Completion::Success(payload.into()))
    }

    /// Complete with an engine failure code.
    pub fn fail(&self, code: EngineErrorCode) -> Result<()> {
        self.complete(Completion::Failure(code))
    }
}

impl std::fmt::Debug for CompletionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSlot")
            .field("correlation", &self.state.correlation)
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// Caller-facing end of a completion slot.
pub struct CompletionReceiver {
    rx: oneshot::Receiver<Completion>,
    state: Arc<SlotState>,
}

impl CompletionReceiver {
    /// Correlation context of the call.
    #[inline]
    pub fn correlation(&self) -> CorrelationId {
        self.state.correlation
    }

    /// Suspend until the engine completes the slot.
    ///
    /// Suspends forever if the engine keeps the slot alive and never
    /// completes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if every slot handle was dropped
    /// without a completion, or if the slot was completed more than once
    /// before this call observed the result.
    pub async fn wait(self) -> Result<Completion> {
        let correlation = self.state.correlation;

        let completion = self.rx.await.map_err(|_| {
            tracing::error!("Completion slot {} dropped without completing", correlation);
            Error::ProtocolViolation(format!(
                "completion slot {} dropped without completing",
                correlation
            ))
        })?;

        if self.state.completions.load(Ordering::Acquire) > 1 {
            return Err(Error::ProtocolViolation(format!(
                "completion slot {} fired more than once",
                correlation
            )));
        }

        Ok(completion)
    }
}
