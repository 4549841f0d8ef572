//! Marker files and their wire format

use std::path::{Path, PathBuf};

/// Fixed marker filename, matched by exact name only
pub const MARKER_FILENAME: &str = "AGENTS.md";

/// A marker file discovered under the project root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    /// Absolute path, used as the dedup key
    pub path: PathBuf,

    /// Path relative to the project root, used for display and metadata
    pub relative: PathBuf,
}

impl Marker {
    pub fn new(path: PathBuf, project_root: &Path) -> Self {
        let relative = path
            .strip_prefix(project_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        Self { path, relative }
    }

    /// Relative path rendered with native separators
    pub fn display_path(&self) -> String {
        self.relative.display().to_string()
    }

    /// Wrap raw marker content for delivery into a session
    pub fn wrap(&self, content: &str) -> String {
        format_injection(&self.display_path(), content)
    }
}

/// `<agents-md path="...">\n{content}\n</agents-md>`, content left untouched
pub fn format_injection(relative_path: &str, content: &str) -> String {
    format!(
        "<agents-md path=\"{}\">\n{}\n</agents-md>",
        relative_path, content
    )
}
