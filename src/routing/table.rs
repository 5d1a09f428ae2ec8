use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Segment key an interior node uses for its own content.
pub const INDEX: &str = "index";

/// One node of the route tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RouteNode {
    /// A content-key handed to the content provider.
    Leaf(String),
    /// Nested routes, keyed by path segment.
    Interior(BTreeMap<String, RouteNode>),
}

/// The top level of a route tree. Always a mapping.
///
/// Decoded from a JSON object whose values are strings (content-keys) or
/// nested objects; any other JSON type is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteNode>,
}

impl RouteTable {
    pub fn new(routes: BTreeMap<String, RouteNode>) -> Self {
        Self { routes }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid route table {}", path.display()))
    }

    pub fn routes(&self) -> &BTreeMap<String, RouteNode> {
        &self.routes
    }
}
