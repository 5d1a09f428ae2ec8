use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use mio::event::Event;
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token, Waker};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, Phase};
use crate::http::handler::RequestHandler;

const LISTENER: Token = Token(0);
const WAKER: Token = Token(1);
const FIRST_CONNECTION: usize = 2;

const EVENT_CAPACITY: usize = 1024;

/// Stops a running [`Server`] from another thread.
#[derive(Clone)]
pub struct ServerHandle {
    waker: Arc<Waker>,
    shutdown: Arc<AtomicBool>,
}

impl ServerHandle {
    /// Asks the loop to return after its current batch of events.
    pub fn shutdown(&self) -> io::Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.waker.wake()
    }
}

/// Single-threaded readiness loop.
///
/// Owns the poller, the listening socket and every live connection. Nothing
/// here is shared; other threads can only reach it through a [`ServerHandle`].
pub struct Server {
    poll: Poll,
    listener: TcpListener,
    connections: HashMap<Token, Connection<TcpStream>>,
    next_token: usize,
    handler: RequestHandler,
    idle_timeout: Option<Duration>,
    waker: Arc<Waker>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    pub fn bind(cfg: &Config, handler: RequestHandler) -> anyhow::Result<Self> {
        let std_listener = std::net::TcpListener::bind(&cfg.listen_addr)
            .with_context(|| format!("Failed to bind {}", cfg.listen_addr))?;
        std_listener.set_nonblocking(true)?;
        let mut listener = TcpListener::from_std(std_listener);

        let poll = Poll::new().context("Failed to create poller")?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;
        let waker = Arc::new(Waker::new(poll.registry(), WAKER)?);

        Ok(Self {
            poll,
            listener,
            connections: HashMap::new(),
            next_token: FIRST_CONNECTION,
            handler,
            idle_timeout: cfg.idle_timeout(),
            waker,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            waker: Arc::clone(&self.waker),
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Serves until [`ServerHandle::shutdown`] is called.
    ///
    /// Only a failing poller ends the loop with an error; per-connection
    /// failures close that connection and are logged.
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        let mut events = Events::with_capacity(EVENT_CAPACITY);

        while !self.shutdown.load(Ordering::SeqCst) {
            if let Err(e) = self.poll.poll(&mut events, self.poll_timeout()) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(e).context("Poll failed");
            }

            for event in events.iter() {
                match event.token() {
                    LISTENER => self.accept_connections(),
                    WAKER => {}
                    token => self.drive_connection(token, event),
                }
            }

            if let Some(timeout) = self.idle_timeout {
                self.close_idle(timeout);
            }
        }

        info!(open = self.connections.len(), "Server shutting down");
        Ok(())
    }

    /// Time until the longest-idle connection reaches the idle timeout.
    fn poll_timeout(&self) -> Option<Duration> {
        let timeout = self.idle_timeout?;
        let now = Instant::now();
        let longest_idle = self.connections.values().map(|conn| conn.idle_for(now)).max();
        Some(poll_wait(timeout, longest_idle))
    }

    fn accept_connections(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    let token = Token(self.next_token);
                    self.next_token += 1;

                    if let Err(e) = self.poll.registry().register(
                        &mut stream,
                        token,
                        Interest::READABLE | Interest::WRITABLE,
                    ) {
                        error!(%peer, error = %e, "Failed to register connection");
                        continue;
                    }

                    info!("Accepted connection from {}", peer);
                    self.connections.insert(token, Connection::new(stream, peer));
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(error = %e, "Accept failed");
                    break;
                }
            }
        }
    }

    fn drive_connection(&mut self, token: Token, event: &Event) {
        let Some(conn) = self.connections.get_mut(&token) else {
            return;
        };

        // read errors and hangups surface through the read path
        let readable = event.is_readable() || event.is_read_closed() || event.is_error();
        let result = service(conn, &self.handler, readable);
        let peer = conn.peer();
        let closed = conn.phase() == Phase::Closed;

        if let Err(e) = result {
            warn!(%peer, error = %e, "Connection error");
        }
        if closed {
            self.close_connection(token);
        }
    }

    fn close_idle(&mut self, timeout: Duration) {
        let now = Instant::now();
        let idle: Vec<Token> = self
            .connections
            .iter_mut()
            .filter(|(_, conn)| conn.idle_for(now) >= timeout)
            .map(|(token, conn)| {
                conn.mark_closed();
                *token
            })
            .collect();

        for token in idle {
            debug!(token = token.0, "Closing idle connection");
            self.close_connection(token);
        }
    }

    fn close_connection(&mut self, token: Token) {
        let Some(mut conn) = self.connections.remove(&token) else {
            return;
        };

        if let Err(e) = self.poll.registry().deregister(conn.stream_mut()) {
            debug!(peer = %conn.peer(), error = %e, "Deregister failed");
        }
        info!("Closed connection from {}", conn.peer());
    }
}

/// Poll wait that wakes the loop when the longest-idle connection expires.
fn poll_wait(idle_timeout: Duration, longest_idle: Option<Duration>) -> Duration {
    match longest_idle {
        Some(idle) => idle_timeout.saturating_sub(idle),
        None => idle_timeout,
    }
}

/// Advances one connection after a readiness event.
///
/// Reads whatever is available; once the buffer holds a complete request it
/// is answered and the response queued. Pending output is flushed on every
/// call, so a writable event with nothing queued does nothing.
///
/// A failed read or write, or a peer that hung up with nothing left to send,
/// leaves the connection in [`Phase::Closed`].
pub fn service<S: Read + Write>(
    conn: &mut Connection<S>,
    handler: &RequestHandler,
    readable: bool,
) -> io::Result<()> {
    let result = advance(conn, handler, readable);
    if result.is_err() || conn.is_finished() {
        conn.mark_closed();
    }
    result
}

fn advance<S: Read + Write>(
    conn: &mut Connection<S>,
    handler: &RequestHandler,
    readable: bool,
) -> io::Result<()> {
    if readable {
        conn.fill_inbound()?;

        if conn.has_complete_request() {
            let raw = conn.take_request();
            debug_assert_eq!(conn.phase(), Phase::Processing);

            let response = handler.respond(&raw);
            debug!(
                peer = %conn.peer(),
                status = response.status.as_u16(),
                "Request served"
            );
            conn.queue_response(&response);
        }
    }

    conn.flush()?;
    Ok(())
}
