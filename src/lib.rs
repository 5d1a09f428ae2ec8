//! Switchyard - static content served through a route table
//!
//! Core library: HTTP handling, route resolution, content providers and the
//! readiness-driven server loop.

pub mod config;
pub mod content;
pub mod http;
pub mod routing;
pub mod server;
