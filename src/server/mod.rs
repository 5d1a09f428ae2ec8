//! Connection multiplexing
//!
//! One thread, one poller. The listener and every client socket are
//! registered with the same `mio::Poll`; each readiness event advances one
//! connection through its state machine:
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Buffer bytes until CRLFCRLF
//!        └──────┬───────────┘
//!               │ Terminator seen
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, route, fetch content
//!        └──────┬───────────┘
//!               │ Response queued
//!               ▼
//!        ┌──────────────────┐
//!        │  AwaitingFlush   │ ← Write as far as the socket allows
//!        └──────┬───────────┘
//!               │ Output drained
//!               ├─ Peer still open → AwaitingRequest (same connection)
//!               └─ Peer closed / I/O error / idle → Closed
//! ```

pub mod listener;

pub use listener::{Server, ServerHandle};
