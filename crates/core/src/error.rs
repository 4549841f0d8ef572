//! Error types shared by every layer.
//!
//! The injection path never surfaces these to the host: the coordinator
//! matches on them and degrades to "nothing injected for this marker".

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by filesystem primitives, host channels and configuration
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl InjectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type InjectResult<T> = Result<T, InjectError>;
