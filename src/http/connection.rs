use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use bytes::BytesMut;

use crate::http::parser::is_complete;
use crate::http::response::Response;
use crate::http::writer::{Flush, ResponseWriter};

/// Upper bound on buffered request bytes without a terminator.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Bytes requested from the socket per read call.
pub const READ_CHUNK: usize = 4096;

/// Where a connection is in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Buffering bytes until the terminator arrives.
    AwaitingRequest,
    /// A complete request is being turned into a response.
    Processing,
    /// A response is queued and not yet fully written.
    AwaitingFlush,
    /// Torn down; the event loop drops it.
    Closed,
}

/// Per-connection buffers and phase.
///
/// Generic over the stream so the buffering logic does not depend on a real
/// socket. The stream must be non-blocking: reads and writes stop at
/// `WouldBlock` and resume on the next readiness event.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    inbound: BytesMut,
    outbound: ResponseWriter,
    phase: Phase,
    peer_closed: bool,
    last_activity: Instant,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            inbound: BytesMut::with_capacity(READ_CHUNK),
            outbound: ResponseWriter::new(),
            phase: Phase::AwaitingRequest,
            peer_closed: false,
            last_activity: Instant::now(),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn inbound(&self) -> &[u8] {
        &self.inbound
    }

    pub fn has_pending_output(&self) -> bool {
        !self.outbound.is_empty()
    }

    pub fn peer_closed(&self) -> bool {
        self.peer_closed
    }

    /// Reads everything currently available into the inbound buffer.
    ///
    /// Returns the number of bytes read. A zero-length read marks the peer
    /// as closed; bytes received before it are kept.
    pub fn fill_inbound(&mut self) -> io::Result<usize> {
        let mut total = 0;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    self.peer_closed = true;
                    break;
                }
                Ok(n) => {
                    self.inbound.extend_from_slice(&chunk[..n]);
                    total += n;

                    if !is_complete(&self.inbound) && self.inbound.len() > MAX_REQUEST_BYTES {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            "request headers too large",
                        ));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if total > 0 {
            self.last_activity = Instant::now();
        }

        Ok(total)
    }

    pub fn has_complete_request(&self) -> bool {
        is_complete(&self.inbound)
    }

    /// Hands out the buffered request and clears the inbound buffer.
    pub fn take_request(&mut self) -> BytesMut {
        self.phase = Phase::Processing;
        self.inbound.split()
    }

    /// Queues a response for writing.
    pub fn queue_response(&mut self, response: &Response) {
        self.outbound.queue(response);
        self.phase = Phase::AwaitingFlush;
    }

    /// Writes pending output; back to `AwaitingRequest` once it is drained.
    pub fn flush(&mut self) -> io::Result<Flush> {
        let written_before = self.outbound.pending();
        let flush = self.outbound.write_to(&mut self.stream)?;

        if self.outbound.pending() != written_before {
            self.last_activity = Instant::now();
        }

        if flush == Flush::Done && self.phase == Phase::AwaitingFlush {
            self.phase = Phase::AwaitingRequest;
        }

        Ok(flush)
    }

    /// The peer is gone and nothing is left to send.
    pub fn is_finished(&self) -> bool {
        self.peer_closed && self.outbound.is_empty()
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn mark_closed(&mut self) {
        self.phase = Phase::Closed;
    }
}
