//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to serve GET requests for static content: the request
//! line is parsed, headers are ignored, and every response carries a single
//! Content-Type header.
//!
//! # Architecture
//!
//! - **`parser`**: Parses the request line out of a buffered request
//! - **`request`**: Parsed request and method representation
//! - **`handler`**: Resolves a request into exactly one response
//! - **`response`**: Status codes and the response value
//! - **`writer`**: Serializes responses and drains them to the socket
//! - **`connection`**: Per-connection inbound/outbound buffering
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use switchyard::http::handler::RequestHandler;
//! use switchyard::http::writer::serialize_response;
//! use switchyard::routing::{RouteTable, StaticRoutes};
//!
//! let table = RouteTable::from_json_str(r#"{"index": "home.html"}"#).unwrap();
//! let content = HashMap::from([("home.html".to_string(), "<h1>Home</h1>".to_string())]);
//! let handler = RequestHandler::new(StaticRoutes::new(table), content);
//!
//! let response = handler.respond(b"GET / HTTP/1.1\r\n\r\n");
//! assert_eq!(
//!     serialize_response(&response),
//!     b"HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<h1>Home</h1>",
//! );
//! ```

pub mod connection;
pub mod handler;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
