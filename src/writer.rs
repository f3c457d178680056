//! Dedicated writer task for the engine stream.
//!
//! Submissions come from many tasks at once; the stream has one write half.
//! Instead of sharing the write half behind a mutex, every submitter sends an
//! [`OutboundFrame`] over a bounded mpsc channel and a single task owns the
//! stream:
//!
//! ```text
//! submit 1 ─┐
//! submit 2 ─┼─► mpsc::Sender<OutboundFrame> ─► writer task ─► engine stream
//! submit N ─┘
//! ```
//!
//! The writer drains whatever is queued into one batch and writes it with
//! `write_vectored`. A full channel is backpressure: `send` waits, up to the
//! configured timeout, for the writer to catch up.

use std::io::IoSlice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::protocol::{Header, HEADER_SIZE};

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default backpressure timeout.
pub const DEFAULT_BACKPRESSURE_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum frames to batch in a single write operation.
const MAX_BATCH_SIZE: usize = 64;

/// A frame ready to be written to the engine stream.
#[derive(Debug)]
pub struct OutboundFrame {
    header: [u8; HEADER_SIZE],
    payload: Bytes,
}

impl OutboundFrame {
    /// Encode a frame; the payload length goes into the header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the payload does not fit a `u32` length.
    pub fn new(op: u16, flags: u8, request_id: u32, payload: Bytes) -> Result<Self> {
        let length = u32::try_from(payload.len()).map_err(|_| {
            Error::Protocol(format!(
                "payload of {} bytes does not fit a frame",
                payload.len()
            ))
        })?;

        Ok(Self {
            header: Header::new(op, flags, request_id, length).encode(),
            payload,
        })
    }

    /// Total size of this frame (header + payload).
    #[inline]
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    fn segments(&self) -> [&[u8]; 2] {
        [&self.header[..], self.payload.as_ref()]
    }
}

/// Configuration for the writer task.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Frames that may queue before `send` starts waiting.
    pub channel_capacity: usize,
    /// How long `send` waits for queue space.
    pub backpressure_timeout: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            backpressure_timeout: DEFAULT_BACKPRESSURE_TIMEOUT,
        }
    }
}

/// Cheaply cloneable handle for queueing frames on the writer task.
#[derive(Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<OutboundFrame>,
    pending: Arc<AtomicUsize>,
    timeout: Duration,
}

impl WriterHandle {
    /// Queue a frame for writing.
    ///
    /// # Errors
    ///
    /// - [`Error::BackpressureTimeout`] if the queue stayed full for the
    ///   configured timeout
    /// - [`Error::ConnectionClosed`] if the writer task has stopped
    pub async fn send(&self, frame: OutboundFrame) -> Result<()> {
        self.pending.fetch_add(1, Ordering::AcqRel);

        let result = match tokio::time::timeout(self.timeout, self.tx.send(frame)).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => Err(Error::BackpressureTimeout),
        };

        self.pending.fetch_sub(1, Ordering::AcqRel);
        result
    }

    /// Frames queued or being written.
    #[inline]
    pub fn pending_frames(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether the writer task has stopped.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawn the writer task on the current runtime.
///
/// The task ends with `Ok(())` once every handle is dropped, or with the
/// first write error.
pub fn spawn_writer_task<W>(writer: W, config: WriterConfig) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let pending = Arc::new(AtomicUsize::new(0));

    let handle = WriterHandle {
        tx,
        pending: pending.clone(),
        timeout: config.backpressure_timeout,
    };

    let task = tokio::spawn(writer_loop(rx, writer, pending));

    (handle, task)
}

async fn writer_loop<W>(
    mut rx: mpsc::Receiver<OutboundFrame>,
    mut writer: W,
    pending: Arc<AtomicUsize>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);

    while let Some(first) = rx.recv().await {
        batch.push(first);
        while batch.len() < MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(frame) => batch.push(frame),
                Err(_) => break,
            }
        }

        if let Err(e) = write_batch(&mut writer, &batch).await {
            tracing::error!("Engine stream write failed: {}", e);
            return Err(e);
        }

        tracing::trace!("Wrote batch of {} frames", batch.len());
        pending.fetch_sub(batch.len(), Ordering::AcqRel);
        batch.clear();
    }

    tracing::debug!("Writer task stopping: all handles dropped");
    Ok(())
}

/// Write a batch of frames with `write_vectored`, resuming after short writes.
async fn write_batch<W>(writer: &mut W, batch: &[OutboundFrame]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let total: usize = batch.iter().map(OutboundFrame::size).sum();
    let mut written = 0;

    while written < total {
        let slices = remaining_slices(batch, written);
        let n = writer.write_vectored(&slices).await?;
        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "engine stream accepted no bytes",
            )));
        }
        written += n;
    }

    writer.flush().await?;
    Ok(())
}

/// Slices covering everything in `batch` after the first `skip` bytes.
fn remaining_slices(batch: &[OutboundFrame], mut skip: usize) -> Vec<IoSlice<'_>> {
    batch
        .iter()
        .flat_map(OutboundFrame::segments)
        .filter_map(|segment| {
            if skip >= segment.len() {
                skip -= segment.len();
                None
            } else {
                let rest = &segment[skip..];
                skip = 0;
                Some(IoSlice::new(rest))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{duplex, AsyncReadExt};

    use crate::protocol::{flags, FrameBuffer, OP_EXECUTE};

    fn frame(request_id: u32, payload: &'static [u8]) -> OutboundFrame {
        OutboundFrame::new(
            OP_EXECUTE,
            flags::REQUEST,
            request_id,
            Bytes::from_static(payload),
        )
        .unwrap()
    }

    /// Accepts at most three bytes per write call.
    struct Trickle(Vec<u8>);

    impl AsyncWrite for Trickle {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            let n = buf.len().min(3);
            self.0.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_outbound_frame_sets_length() {
        let frame = frame(42, b"hello");
        assert_eq!(frame.size(), HEADER_SIZE + 5);

        let header = Header::decode(&frame.header).unwrap();
        assert_eq!(header.payload_length, 5);
        assert_eq!(header.request_id, 42);
    }

    #[test]
    fn test_remaining_slices() {
        let batch = vec![frame(1, b"hello"), frame(2, b"")];

        let slices = remaining_slices(&batch, 0);
        assert_eq!(slices.len(), 3);

        let slices = remaining_slices(&batch, 5);
        assert_eq!(slices[0].len(), HEADER_SIZE - 5);
        assert_eq!(slices[1].len(), 5);

        let slices = remaining_slices(&batch, HEADER_SIZE + 5);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].len(), HEADER_SIZE);
    }

    #[tokio::test]
    async fn test_write_batch_survives_short_writes() {
        let mut sink = Trickle(Vec::new());
        let batch = vec![frame(1, b"first"), frame(2, b"second")];

        write_batch(&mut sink, &batch).await.unwrap();

        let frames = FrameBuffer::new().push(&sink.0).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].payload(), b"first");
        assert_eq!(frames[1].payload(), b"second");
    }

    #[tokio::test]
    async fn test_send_reaches_stream() {
        let (client, mut server) = duplex(4096);
        let (handle, _task) = spawn_writer_task(client, WriterConfig::default());

        for i in 0..10u32 {
            handle.send(frame(i, b"ping")).await.unwrap();
        }

        let mut buf = vec![0u8; 10 * (HEADER_SIZE + 4)];
        server.read_exact(&mut buf).await.unwrap();

        let frames = FrameBuffer::new().push(&buf).unwrap();
        let ids: Vec<u32> = frames.iter().map(|f| f.request_id()).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_backpressure_timeout() {
        // Nobody reads the other end, so the writer stalls
        let (client, _server) = duplex(16);
        let config = WriterConfig {
            channel_capacity: 1,
            backpressure_timeout: Duration::from_millis(50),
        };
        let (handle, _task) = spawn_writer_task(client, config);

        let mut timed_out = false;
        for i in 0..6 {
            match handle
                .send(frame(i, b"a payload that overflows the pipe"))
                .await
            {
                Ok(()) => {}
                Err(e) => {
                    assert!(matches!(e, Error::BackpressureTimeout));
                    timed_out = true;
                    break;
                }
            }
        }

        assert!(timed_out);
    }

    #[tokio::test]
    async fn test_write_error_stops_task() {
        let (client, server) = duplex(64);
        drop(server);

        let (handle, task) = spawn_writer_task(client, WriterConfig::default());
        handle.send(frame(1, b"lost")).await.unwrap();

        assert!(task.await.unwrap().is_err());
        assert!(matches!(
            handle.send(frame(2, b"late")).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_on_handle_drop() {
        let (client, _server) = duplex(4096);
        let (handle, task) = spawn_writer_task(client, WriterConfig::default());

        drop(handle);

        assert!(task.await.unwrap().is_ok());
    }
}
