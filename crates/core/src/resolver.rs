//! Path Resolver - ancestor marker discovery
//!
//! Walks from the project root down to the directory of a file and collects
//! every `AGENTS.md` found on the way, shallowest first. The root's own
//! marker is never visited (depth 0 is skipped).

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::fs::MarkerFs;
use crate::marker::{MARKER_FILENAME, Marker};

/// Fold `.` and `..` without touching the filesystem, so that
/// `root/a/../../x` is seen as leaving the root. `..` never climbs above `/`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !matches!(last, Some(Component::RootDir)) {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Ancestor marker resolver anchored at a fixed project root
#[derive(Debug, Clone)]
pub struct PathResolver {
    project_root: PathBuf,
}

impl PathResolver {
    /// `project_root` is expected to be absolute
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: normalize_path(project_root.as_ref()),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Absolute paths pass through, relative ones are joined onto the root
    pub fn absolutize(&self, raw_path: &str) -> PathBuf {
        let path = Path::new(raw_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Segments of `dir` below the project root, or `None` when `dir`
    /// lies outside it
    fn relative_segments(&self, dir: &Path) -> Option<Vec<PathBuf>> {
        let dir = normalize_path(dir);
        let relative = dir.strip_prefix(&self.project_root).ok()?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(PathBuf::from(segment)),
                Component::CurDir => {}
                // Anything else means the path escaped the root
                _ => return None,
            }
        }
        Some(segments)
    }

    /// Existing ancestor markers for `file_path`, shallowest first,
    /// excluding the root's own marker
    pub fn resolve(&self, file_path: &Path, fs: &dyn MarkerFs) -> Vec<Marker> {
        let Some(dir) = file_path.parent() else {
            return Vec::new();
        };

        let Some(segments) = self.relative_segments(dir) else {
            debug!("{} is outside {}", dir.display(), self.project_root.display());
            return Vec::new();
        };

        let mut markers = Vec::new();
        let mut current = self.project_root.clone();
        for segment in &segments {
            current.push(segment);
            let candidate = current.join(MARKER_FILENAME);
            if fs.exists(&candidate) {
                markers.push(Marker::new(candidate, &self.project_root));
            }
        }
        markers
    }
}
