//! Route table and path resolution
//!
//! A route table maps path segments to either a content-key (a leaf) or a
//! nested table. Directory-like routes serve their `"index"` leaf.
//!
//! ```text
//! {
//!   "index": "home.html",          GET /         -> home.html
//!   "about": "about.html",         GET /about    -> about.html
//!   "blog": {
//!     "index": "blog_home.html",   GET /blog     -> blog_home.html
//!     "post1": "p1.html"           GET /blog/post1 -> p1.html
//!   }
//! }
//! ```

pub mod resolver;
pub mod source;
pub mod table;

pub use resolver::{RouteError, resolve_route};
pub use source::{JsonFileRoutes, RouteSource, StaticRoutes};
pub use table::{RouteNode, RouteTable};
