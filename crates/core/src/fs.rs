//! Filesystem primitives used for marker discovery and reading
//!
//! Discovery only needs an existence probe; content is read later, at
//! injection time, and may fail if the file vanished in between.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::{InjectError, InjectResult};

/// Storage access needed by the resolver and the coordinator
#[async_trait]
pub trait MarkerFs: Send + Sync {
    /// Whether any filesystem entry exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Full text content of the file at `path`, invalid UTF-8 replaced
    async fn read_to_string(&self, path: &Path) -> InjectResult<String>;
}

/// Shared filesystem reference
pub type SharedFs = Arc<dyn MarkerFs>;

/// Host filesystem backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarkerFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn read_to_string(&self, path: &Path) -> InjectResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| InjectError::io(path, e))?;
        // Marker content is opaque; invalid UTF-8 must not block delivery
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Create a shared handle to the host filesystem
pub fn create_local_fs() -> SharedFs {
    Arc::new(LocalFs::new())
}
