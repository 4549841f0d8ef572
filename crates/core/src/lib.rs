// agentsmd Core - marker discovery primitives
//!
//! 包含：
//! - resolver: ancestor `AGENTS.md` discovery below a project root
//! - marker: marker identity and the `<agents-md>` wire format
//! - fs: filesystem primitives (existence probe, content read)
//! - config: YAML configuration
//! - error: shared error type

mod config;
mod error;
mod fs;
mod marker;
mod resolver;

pub use config::*;
pub use error::*;
pub use fs::*;
pub use marker::*;
pub use resolver::*;
