//! A single protocol frame: header plus payload.
//!
//! Payloads are `bytes::Bytes`, so a frame split off the read buffer shares
//! its memory instead of copying.

use bytes::Bytes;

use super::wire_format::{Header, HEADER_SIZE};

/// A complete protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: Header, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Operation code.
    #[inline]
    pub fn op(&self) -> u16 {
        self.header.op
    }

    /// Request ID.
    #[inline]
    pub fn request_id(&self) -> u32 {
        self.header.request_id
    }

    /// Check if this is a successful response.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.header.is_response() && !self.header.is_error()
    }

    /// Check if this is an error response.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.header.is_response() && self.header.is_error()
    }
}

/// Build a complete frame as a single byte vector.
///
/// The header's `payload_length` is taken from `payload`.
///
/// # Example
///
/// ```
/// use ledger_sdk::protocol::{build_frame, flags, HEADER_SIZE, OP_EXECUTE};
///
/// let bytes = build_frame(OP_EXECUTE, flags::RESPONSE, 42, b"{}");
/// assert_eq!(bytes.len(), HEADER_SIZE + 2);
/// ```
pub fn build_frame(op: u16, flags: u8, request_id: u32, payload: &[u8]) -> Vec<u8> {
    let header = Header::new(op, flags, request_id, payload.len() as u32);

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{flags, FrameBuffer, OP_EXECUTE};

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::new(
            Header::new(OP_EXECUTE, flags::RESPONSE, 42, 2),
            Bytes::from_static(b"{}"),
        );

        assert_eq!(frame.op(), OP_EXECUTE);
        assert_eq!(frame.request_id(), 42);
        assert_eq!(frame.payload(), b"{}");
        assert!(frame.is_success());
        assert!(!frame.is_error());
    }

    #[test]
    fn test_request_is_neither_success_nor_error() {
        let frame = Frame::new(Header::new(OP_EXECUTE, flags::REQUEST, 1, 0), Bytes::new());
        assert!(!frame.is_success());
        assert!(!frame.is_error());
    }

    #[test]
    fn test_build_frame_roundtrip() {
        let bytes = build_frame(OP_EXECUTE, flags::ERROR_RESPONSE, 456, &[0x01]);
        assert_eq!(bytes.len(), HEADER_SIZE + 1);

        let mut buffer = FrameBuffer::new();
        let frames = buffer.push(&bytes).unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].request_id(), 456);
        assert_eq!(frames[0].payload(), &[0x01]);
        assert!(frames[0].is_error());
    }
}
