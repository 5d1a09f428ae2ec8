use std::io::{self, Write};

use bytes::{Buf, BytesMut};

use crate::http::response::Response;

const CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Serializes a response into wire bytes.
///
/// Status line, the Content-Type header, a blank line, then the payload.
/// There is no Content-Length; the exchange boundary delimits the body.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    buf.extend_from_slice(b"Content-Type: ");
    buf.extend_from_slice(CONTENT_TYPE.as_bytes());
    buf.extend_from_slice(b"\r\n");

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    if let Some(payload) = &resp.payload {
        buf.extend_from_slice(payload.as_bytes());
    }

    buf
}

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// Everything queued has been written.
    Done,
    /// The sink would block; the rest waits for the next writable event.
    Pending,
}

/// Outbound bytes of a connection, drained as the socket accepts them.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    buffer: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Serializes a response and appends it to the pending output.
    pub fn queue(&mut self, response: &Response) {
        self.buffer.extend_from_slice(&serialize_response(response));
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes as much pending output as the non-blocking sink takes.
    ///
    /// An empty buffer is a no-op that reports `Flush::Done`.
    pub fn write_to<W: Write>(&mut self, sink: &mut W) -> io::Result<Flush> {
        while !self.buffer.is_empty() {
            match sink.write(&self.buffer) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "connection closed while writing",
                    ));
                }
                Ok(n) => self.buffer.advance(n),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(Flush::Pending),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Flush::Done)
    }
}
