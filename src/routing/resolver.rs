//! Path → content-key resolution.
//!
//! Every call walks the tree from the root; nothing is cached.

use std::collections::BTreeMap;

use crate::routing::table::{INDEX, RouteNode, RouteTable};

/// Reasons a path has no content-key. All of them answer 404.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route for segment {0:?}")]
    NotFound(String),
    #[error("route ends at {0:?} but the path continues")]
    OverSpecified(String),
    #[error("directory route has no index leaf")]
    MissingIndex,
}

/// Resolves a request path to the content-key it is bound to.
///
/// The leading `/` is dropped and the rest split on `/`. `"/"` addresses the
/// root's index. A path ending on an interior node resolves to that node's
/// index leaf. Trailing slashes are not normalized.
///
/// # Example
///
/// ```
/// # use switchyard::routing::{resolve_route, RouteTable};
/// let table = RouteTable::from_json_str(
///     r#"{"index": "home.html", "blog": {"index": "blog_home.html"}}"#,
/// ).unwrap();
/// assert_eq!(resolve_route("/", &table), Ok("home.html"));
/// assert_eq!(resolve_route("/blog", &table), Ok("blog_home.html"));
/// ```
pub fn resolve_route<'t>(path: &str, table: &'t RouteTable) -> Result<&'t str, RouteError> {
    let segments = split_path(path);
    let routes = table.routes();

    let Some((first, rest)) = segments.split_first() else {
        return index_of(routes);
    };

    match find_route(routes, first, rest)? {
        RouteNode::Leaf(key) => Ok(key.as_str()),
        RouteNode::Interior(children) => index_of(children),
    }
}

fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

fn find_route<'t>(
    routes: &'t BTreeMap<String, RouteNode>,
    segment: &str,
    rest: &[&str],
) -> Result<&'t RouteNode, RouteError> {
    let node = routes
        .get(segment)
        .ok_or_else(|| RouteError::NotFound(segment.to_string()))?;

    match (node, rest.split_first()) {
        (_, None) => Ok(node),
        (RouteNode::Interior(children), Some((next, rest))) => find_route(children, next, rest),
        (RouteNode::Leaf(_), Some(_)) => Err(RouteError::OverSpecified(segment.to_string())),
    }
}

fn index_of(routes: &BTreeMap<String, RouteNode>) -> Result<&str, RouteError> {
    match routes.get(INDEX) {
        Some(RouteNode::Leaf(key)) => Ok(key.as_str()),
        _ => Err(RouteError::MissingIndex),
    }
}
