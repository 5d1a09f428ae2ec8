//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};
use std::net::SocketAddr;

use switchyard::http::handler::RequestHandler;
use switchyard::routing::{RouteTable, StaticRoutes};

pub const SITE_ROUTES: &str = r#"{
    "index": "home.html",
    "about": "about.html",
    "blog": {
        "index": "blog_home.html",
        "post1": "p1.html"
    },
    "archive": {
        "2023": "old.html"
    },
    "ghost": "missing.html"
}"#;

pub fn site_table() -> RouteTable {
    RouteTable::from_json_str(SITE_ROUTES).unwrap()
}

pub fn site_content() -> HashMap<String, String> {
    HashMap::from([
        ("home.html".to_string(), "<h1>Home</h1>".to_string()),
        ("about.html".to_string(), "<h1>About</h1>".to_string()),
        ("blog_home.html".to_string(), "<h1>Blog</h1>".to_string()),
        ("p1.html".to_string(), "<p>First post</p>".to_string()),
        ("old.html".to_string(), "<p>2023</p>".to_string()),
    ])
}

pub fn site_handler() -> RequestHandler {
    RequestHandler::new(StaticRoutes::new(site_table()), site_content())
}

pub fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

pub fn expected_response(status_line: &str, body: &str) -> String {
    format!("{status_line}\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{body}")
}

/// What the next `read` call on a [`MockStream`] returns.
pub enum ReadStep {
    Data(Vec<u8>),
    WouldBlock,
    Eof,
    Fail(io::ErrorKind),
}

/// In-memory non-blocking stream.
///
/// Reads follow a script; once it runs out every read would block. Writes
/// accept at most `write_budget` bytes in total before blocking.
pub struct MockStream {
    pub reads: VecDeque<ReadStep>,
    pub written: Vec<u8>,
    pub write_budget: usize,
    pub write_error: Option<io::ErrorKind>,
}

impl MockStream {
    pub fn new() -> Self {
        Self {
            reads: VecDeque::new(),
            written: Vec::new(),
            write_budget: usize::MAX,
            write_error: None,
        }
    }

    pub fn push_data(&mut self, data: &[u8]) {
        self.reads.push_back(ReadStep::Data(data.to_vec()));
        self.reads.push_back(ReadStep::WouldBlock);
    }

    pub fn push_eof(&mut self) {
        self.reads.push_back(ReadStep::Eof);
    }

    pub fn written_str(&self) -> String {
        String::from_utf8(self.written.clone()).unwrap()
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    let rest = data.split_off(n);
                    self.reads.push_front(ReadStep::Data(rest));
                }
                Ok(n)
            }
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Fail(kind)) => Err(io::Error::from(kind)),
            Some(ReadStep::WouldBlock) | None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(io::Error::from(kind));
        }
        if self.write_budget == 0 {
            return Err(io::Error::from(io::ErrorKind::WouldBlock));
        }
        let n = buf.len().min(self.write_budget);
        self.written.extend_from_slice(&buf[..n]);
        self.write_budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
