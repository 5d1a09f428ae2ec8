//! Request resolution
//!
//! Turns a request into exactly one response. Malformed input, missing
//! routes and rejected methods all become ordinary responses here; nothing
//! reaches the event loop as an error.

use anyhow::Context;

use crate::config::Config;
use crate::content::{ContentProvider, FsContent};
use crate::http::parser::parse_http_request;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::routing::{JsonFileRoutes, RouteSource, StaticRoutes, resolve_route};

pub struct RequestHandler {
    routes: Box<dyn RouteSource>,
    content: Box<dyn ContentProvider>,
}

impl RequestHandler {
    pub fn new(
        routes: impl RouteSource + 'static,
        content: impl ContentProvider + 'static,
    ) -> Self {
        Self {
            routes: Box::new(routes),
            content: Box::new(content),
        }
    }

    /// Builds the file-backed handler described by the configuration.
    ///
    /// With `reload_routes` off the route table is read here, once, and a
    /// broken file fails startup instead of every request.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let content = FsContent::new(&cfg.content_root);

        if cfg.reload_routes {
            return Ok(Self::new(JsonFileRoutes::new(&cfg.routes_file), content));
        }

        let routes = StaticRoutes::from_json_file(&cfg.routes_file)
            .context("Failed to load route table")?;
        Ok(Self::new(routes, content))
    }

    /// Parses raw request bytes and resolves them; malformed input is a 400.
    pub fn respond(&self, raw: &[u8]) -> Response {
        match parse_http_request(raw) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed request");
                Response::bad_request()
            }
        }
    }

    pub fn handle(&self, req: &Request) -> Response {
        match req.method {
            Method::GET => self.serve(req),
            _ => Response::method_not_allowed(&req.version),
        }
    }

    fn serve(&self, req: &Request) -> Response {
        let table = match self.routes.load() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, path = %req.path, "Route table unavailable");
                return Response::not_found(&req.version);
            }
        };

        let key = match resolve_route(&req.path, &table) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(path = %req.path, reason = %e, "No route");
                return Response::not_found(&req.version);
            }
        };

        match self.content.fetch(key) {
            Some(content) => Response::ok(&req.version, content),
            None => Response::not_found(&req.version),
        }
    }
}
