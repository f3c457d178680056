//! Engine adapter over a framed byte stream.
//!
//! [`FramedEngine`] talks to an engine running in another process (or behind
//! any `AsyncRead + AsyncWrite` transport). Every submission becomes one
//! request frame; the engine answers each request id with exactly one
//! response frame.
//!
//! ```text
//! submit ─► pending[id] = slot ─► writer task ─► stream ─► engine
//!                                                            │
//! slot.complete ◄── pending.remove(id) ◄── read loop ◄───────┘
//! ```
//!
//! | Direction | Flags | Payload |
//! |-----------|-------|---------|
//! | request | `REQUEST` | MsgPack map `{correlation, request, session}` |
//! | response | `RESPONSE` | UTF-8 response text |
//! | response | `ERROR_RESPONSE` | MsgPack `i32` engine code |
//!
//! When the stream ends or fails, every pending slot fails with
//! [`EngineErrorCode::ConnectionClosed`] and later submissions fail the same
//! way.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{Completion, CompletionSlot, CorrelationId, Engine, EngineErrorCode, Submission};
use crate::client::Session;
use crate::codec::MsgPackCodec;
use crate::error::{Error, Result};
use crate::protocol::{flags, Frame, FrameBuffer, DEFAULT_MAX_PAYLOAD_SIZE, OP_EXECUTE};
use crate::writer::{spawn_writer_task, OutboundFrame, WriterConfig, WriterHandle};

/// Read buffer size for the engine stream.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for a [`FramedEngine`].
#[derive(Debug, Clone)]
pub struct FramedEngineConfig {
    /// Writer task settings.
    pub writer: WriterConfig,
    /// Largest response payload accepted from the engine.
    pub max_payload_size: u32,
}

impl Default for FramedEngineConfig {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    correlation: CorrelationId,
    request: &'a str,
    session: &'a Session,
}

#[derive(Default)]
struct Pending {
    slots: HashMap<u32, CompletionSlot>,
    next_id: u32,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    pending: Mutex<Pending>,
}

impl Shared {
    /// Park a slot under a fresh request id, or hand it back if closed.
    fn register(&self, slot: CompletionSlot) -> std::result::Result<u32, CompletionSlot> {
        let mut pending = self.pending.lock();
        if pending.closed {
            return Err(slot);
        }

        let id = loop {
            pending.next_id = pending.next_id.wrapping_add(1);
            let candidate = pending.next_id;
            if candidate != 0 && !pending.slots.contains_key(&candidate) {
                break candidate;
            }
        };

        pending.slots.insert(id, slot);
        Ok(id)
    }

    fn take(&self, request_id: u32) -> Option<CompletionSlot> {
        self.pending.lock().slots.remove(&request_id)
    }

    fn fail(&self, request_id: u32, code: EngineErrorCode) {
        if let Some(slot) = self.take(request_id) {
            resolve(&slot, Completion::Failure(code));
        }
    }

    /// Refuse new submissions and fail everything still pending.
    fn shutdown(&self) {
        let orphans: Vec<CompletionSlot> = {
            let mut pending = self.pending.lock();
            pending.closed = true;
            pending.slots.drain().map(|(_, slot)| slot).collect()
        };

        if !orphans.is_empty() {
            tracing::warn!(
                "Engine connection closed with {} requests pending",
                orphans.len()
            );
        }

        for slot in orphans {
            resolve(&slot, Completion::Failure(EngineErrorCode::ConnectionClosed));
        }
    }

    fn dispatch(&self, frame: Frame) {
        let request_id = frame.request_id();

        if !frame.header.is_response() {
            tracing::warn!("Ignoring non-response frame for request {}", request_id);
            return;
        }

        let Some(slot) = self.take(request_id) else {
            tracing::warn!("Response for unknown request {}", request_id);
            return;
        };

        let completion = if frame.is_error() {
            match MsgPackCodec::decode::<i32>(frame.payload()) {
                Ok(raw) => Completion::Failure(EngineErrorCode::from_raw(raw)),
                Err(e) => {
                    tracing::warn!("Unreadable error code for request {}: {}", request_id, e);
                    Completion::Failure(EngineErrorCode::MalformedResponse)
                }
            }
        } else {
            match std::str::from_utf8(frame.payload()) {
                Ok(text) => Completion::Success(text.to_string()),
                Err(e) => {
                    tracing::warn!("Response for request {} is not UTF-8: {}", request_id, e);
                    Completion::Failure(EngineErrorCode::MalformedResponse)
                }
            }
        };

        tracing::debug!("Request {} answered for {}", request_id, slot.correlation());
        resolve(&slot, completion);
    }
}

fn resolve(slot: &CompletionSlot, completion: Completion) {
    if let Err(e) = slot.complete(completion) {
        tracing::debug!("Dropping completion for {}: {}", slot.correlation(), e);
    }
}

/// An [`Engine`] reached over a framed byte stream.
pub struct FramedEngine {
    shared: Arc<Shared>,
    writer: WriterHandle,
    runtime: Handle,
    reader_task: JoinHandle<()>,
}

impl FramedEngine {
    /// Start talking to an engine over `stream` with default settings.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::with_config(stream, FramedEngineConfig::default())
    }

    /// Start talking to an engine over `stream`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn with_config<S>(stream: S, config: FramedEngineConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let runtime = Handle::current();
        let shared = Arc::new(Shared::default());
        let (read_half, write_half) = tokio::io::split(stream);

        let (writer, writer_task) = spawn_writer_task(write_half, config.writer);

        let watcher = shared.clone();
        runtime.spawn(async move {
            if let Ok(Err(e)) = writer_task.await {
                tracing::error!("Engine writer stopped: {}", e);
                watcher.shutdown();
            }
        });

        let reader_shared = shared.clone();
        let max_payload_size = config.max_payload_size;
        let reader_task = runtime.spawn(async move {
            match read_loop(read_half, &reader_shared, max_payload_size).await {
                Ok(()) => tracing::debug!("Engine closed the stream"),
                Err(e) => tracing::error!("Engine read loop error: {}", e),
            }
            reader_shared.shutdown();
        });

        Self {
            shared,
            writer,
            runtime,
            reader_task,
        }
    }

    /// Requests submitted but not yet answered.
    pub fn pending_requests(&self) -> usize {
        self.shared.pending.lock().slots.len()
    }

    /// Frames queued for the writer task.
    pub fn pending_frames(&self) -> usize {
        self.writer.pending_frames()
    }

    /// Whether the engine connection is gone.
    pub fn is_closed(&self) -> bool {
        self.shared.pending.lock().closed
    }
}

impl Engine for FramedEngine {
    fn submit(&self, submission: Submission, slot: CompletionSlot) {
        let envelope = Envelope {
            correlation: submission.correlation,
            request: &submission.payload,
            session: &submission.session,
        };

        let payload = match MsgPackCodec::encode(&envelope) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to frame {}: {}", submission.correlation, e);
                resolve(&slot, Completion::Failure(EngineErrorCode::RequestParse));
                return;
            }
        };

        let request_id = match self.shared.register(slot) {
            Ok(id) => id,
            Err(slot) => {
                tracing::debug!("Rejecting {}: engine connection closed", submission.correlation);
                resolve(&slot, Completion::Failure(EngineErrorCode::ConnectionClosed));
                return;
            }
        };

        let frame = OutboundFrame::new(
            OP_EXECUTE,
            flags::REQUEST,
            request_id,
            Bytes::from(payload),
        );
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to frame {}: {}", submission.correlation, e);
                self.shared.fail(request_id, EngineErrorCode::RequestParse);
                return;
            }
        };

        tracing::debug!(
            "Submitting {} as request {}",
            submission.correlation,
            request_id
        );

        let writer = self.writer.clone();
        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            if let Err(e) = writer.send(frame).await {
                tracing::warn!("Failed to queue request {}: {}", request_id, e);
                let code = match e {
                    Error::BackpressureTimeout => EngineErrorCode::TimedOut,
                    _ => EngineErrorCode::ConnectionClosed,
                };
                shared.fail(request_id, code);
            }
        });
    }
}

impl Drop for FramedEngine {
    fn drop(&mut self) {
        self.reader_task.abort();
        self.shared.shutdown();
    }
}

async fn read_loop<R>(mut reader: R, shared: &Shared, max_payload_size: u32) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut frame_buffer = FrameBuffer::with_max_payload(max_payload_size);
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }

        for frame in frame_buffer.push(&buf[..n])? {
            shared.dispatch(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tokio::io::{duplex, AsyncWriteExt, DuplexStream};

    use crate::engine::CompletionReceiver;
    use crate::protocol::build_frame;

    #[derive(Deserialize)]
    struct ReceivedEnvelope {
        correlation: u64,
        request: String,
        session: Session,
    }

    /// Reads request frames from the engine side of the stream.
    struct EngineSide {
        stream: DuplexStream,
        buffer: FrameBuffer,
        queued: Vec<Frame>,
    }

    impl EngineSide {
        fn new(stream: DuplexStream) -> Self {
            Self {
                stream,
                buffer: FrameBuffer::new(),
                queued: Vec::new(),
            }
        }

        async fn next_request(&mut self) -> (u32, ReceivedEnvelope) {
            let mut buf = vec![0u8; 4096];
            while self.queued.is_empty() {
                let n = self.stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed the stream");
                self.queued.extend(self.buffer.push(&buf[..n]).unwrap());
            }
            let frame = self.queued.remove(0);
            assert_eq!(frame.op(), OP_EXECUTE);
            (frame.request_id(), MsgPackCodec::decode(frame.payload()).unwrap())
        }

        async fn respond(&mut self, request_id: u32, text: &[u8]) {
            let bytes = build_frame(OP_EXECUTE, flags::RESPONSE, request_id, text);
            self.stream.write_all(&bytes).await.unwrap();
        }

        async fn reject(&mut self, request_id: u32, code: i32) {
            let payload = MsgPackCodec::encode(&code).unwrap();
            let bytes = build_frame(OP_EXECUTE, flags::ERROR_RESPONSE, request_id, &payload);
            self.stream.write_all(&bytes).await.unwrap();
        }
    }

    fn submit(engine: &FramedEngine, correlation: u64, payload: &str) -> CompletionReceiver {
        let (slot, receiver) = CompletionSlot::channel(CorrelationId(correlation));
        let session = Session {
            payer_account_id: Some(crate::AccountId::from(2)),
            ..Session::default()
        };
        engine.submit(
            Submission {
                correlation: CorrelationId(correlation),
                payload: payload.to_string(),
                session,
            },
            slot,
        );
        receiver
    }

    #[tokio::test]
    async fn test_success_round_trip() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 7, r#"{"$type":"tokenPause"}"#);

        let (id, envelope) = side.next_request().await;
        assert_eq!(envelope.correlation, 7);
        assert_eq!(envelope.request, r#"{"$type":"tokenPause"}"#);
        assert_eq!(envelope.session.payer_account_id.unwrap().to_string(), "0.0.2");

        side.respond(id, br#"{"ok":1}"#).await;

        let completion = receiver.wait().await.unwrap();
        assert_eq!(completion, Completion::Success(r#"{"ok":1}"#.to_string()));
        assert_eq!(engine.pending_requests(), 0);
    }

    #[tokio::test]
    async fn test_error_frame_carries_code() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 1, "{}");
        let (id, _) = side.next_request().await;
        side.reject(id, 4).await;

        let completion = receiver.wait().await.unwrap();
        assert_eq!(
            completion,
            Completion::Failure(EngineErrorCode::PreCheckRejected)
        );
    }

    #[tokio::test]
    async fn test_non_utf8_response_is_malformed() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 1, "{}");
        let (id, _) = side.next_request().await;
        side.respond(id, &[0xff, 0xfe]).await;

        let completion = receiver.wait().await.unwrap();
        assert_eq!(
            completion,
            Completion::Failure(EngineErrorCode::MalformedResponse)
        );
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let first = submit(&engine, 1, r#""first""#);
        let second = submit(&engine, 2, r#""second""#);

        let (id_a, env_a) = side.next_request().await;
        let (id_b, env_b) = side.next_request().await;
        assert_ne!(id_a, id_b);

        // Answer in reverse, echoing each request
        side.respond(id_b, env_b.request.as_bytes()).await;
        side.respond(id_a, env_a.request.as_bytes()).await;

        let (answer_a, answer_b) = (first.wait().await.unwrap(), second.wait().await.unwrap());
        assert_eq!(answer_a, Completion::Success(r#""first""#.to_string()));
        assert_eq!(answer_b, Completion::Success(r#""second""#.to_string()));
    }

    #[tokio::test]
    async fn test_connection_loss_fails_pending() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 1, "{}");
        let _ = side.next_request().await;
        drop(side);

        let completion = receiver.wait().await.unwrap();
        assert_eq!(
            completion,
            Completion::Failure(EngineErrorCode::ConnectionClosed)
        );
        assert!(engine.is_closed());

        // Later submissions fail immediately
        let late = submit(&engine, 2, "{}");
        assert_eq!(
            late.wait().await.unwrap(),
            Completion::Failure(EngineErrorCode::ConnectionClosed)
        );
    }

    #[tokio::test]
    async fn test_unknown_response_is_ignored() {
        let (client, server) = duplex(64 * 1024);
        let engine = FramedEngine::spawn(client);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 1, "{}");
        let (id, _) = side.next_request().await;

        side.respond(id + 100, b"stray").await;
        side.respond(id, b"real").await;

        assert_eq!(
            receiver.wait().await.unwrap(),
            Completion::Success("real".to_string())
        );
    }

    #[tokio::test]
    async fn test_oversized_response_closes_connection() {
        let (client, server) = duplex(64 * 1024);
        let config = FramedEngineConfig {
            max_payload_size: 8,
            ..FramedEngineConfig::default()
        };
        let engine = FramedEngine::with_config(client, config);
        let mut side = EngineSide::new(server);

        let receiver = submit(&engine, 1, "{}");
        let (id, _) = side.next_request().await;
        side.respond(id, b"a response far over the limit").await;

        assert_eq!(
            receiver.wait().await.unwrap(),
            Completion::Failure(EngineErrorCode::ConnectionClosed)
        );
    }
}
