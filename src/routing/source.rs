use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::routing::table::RouteTable;

/// Supplies the route table a request is resolved against.
pub trait RouteSource: Send {
    fn load(&self) -> anyhow::Result<Arc<RouteTable>>;
}

/// Re-reads and re-parses a JSON file for every request.
///
/// Edits to the file take effect on the next request without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileRoutes {
    path: PathBuf,
}

impl JsonFileRoutes {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteSource for JsonFileRoutes {
    fn load(&self) -> anyhow::Result<Arc<RouteTable>> {
        RouteTable::from_json_file(&self.path).map(Arc::new)
    }
}

/// A table loaded once and shared by every request.
#[derive(Debug, Clone)]
pub struct StaticRoutes {
    table: Arc<RouteTable>,
}

impl StaticRoutes {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        RouteTable::from_json_file(path).map(Self::new)
    }
}

impl RouteSource for StaticRoutes {
    fn load(&self) -> anyhow::Result<Arc<RouteTable>> {
        Ok(Arc::clone(&self.table))
    }
}
