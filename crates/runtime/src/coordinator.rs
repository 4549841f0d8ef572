//! Injection Coordinator
//!
//! Correlates the two phases of a read, resolves ancestor markers for the
//! target and delivers each one a session has not seen yet.
//!
//! Per marker: read → host log → toast → session prompt → mark injected.
//! Every step is best-effort for that marker only; nothing here returns an
//! error to the caller.

use agentsmd_core::{DEFAULT_SERVICE_NAME, Marker, PathResolver, SharedFs};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::host::{LogEntry, LogLevel, SessionPrompt, SharedHost, Toast, ToastVariant};
use crate::pending::PendingReads;
use crate::registry::InjectedRegistry;

/// What a single `complete_read` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionOutcome {
    /// Markers delivered and marked, in delivery order
    pub delivered: Vec<Marker>,

    /// Markers that could not be read or delivered
    pub skipped: Vec<Marker>,
}

impl InjectionOutcome {
    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty() && self.skipped.is_empty()
    }
}

/// Owns the pending-read table and the per-session registry
pub struct InjectionCoordinator {
    resolver: PathResolver,
    fs: SharedFs,
    host: SharedHost,
    service_name: String,
    pending: Mutex<PendingReads>,
    registry: Mutex<InjectedRegistry>,
}

impl std::fmt::Debug for InjectionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionCoordinator")
            .field("project_root", &self.resolver.project_root())
            .field("service_name", &self.service_name)
            .finish()
    }
}

// Guards never live across an await, so a poisoned lock still holds
// consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InjectionCoordinator {
    pub fn new(project_root: impl AsRef<Path>, fs: SharedFs, host: SharedHost) -> Self {
        Self {
            resolver: PathResolver::new(project_root),
            fs,
            host,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            pending: Mutex::new(PendingReads::new()),
            registry: Mutex::new(InjectedRegistry::new()),
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn project_root(&self) -> &Path {
        self.resolver.project_root()
    }

    /// "Read started": remember the raw target path for this operation
    pub fn record_pending_read(&self, operation_id: &str, raw_path: &str) {
        lock(&self.pending).record(operation_id, raw_path);
    }

    /// Ancestor markers for a raw path, ignoring session state
    pub fn markers_for(&self, raw_path: &str) -> Vec<Marker> {
        let absolute = self.resolver.absolutize(raw_path);
        self.resolver.resolve(&absolute, self.fs.as_ref())
    }

    /// "Read completed": deliver every new ancestor marker into the session
    pub async fn complete_read(&self, operation_id: &str, session_id: &str) -> InjectionOutcome {
        let taken = lock(&self.pending).take(operation_id);
        let Some(raw_path) = taken else {
            return InjectionOutcome::default();
        };

        let candidates = self.markers_for(&raw_path);
        let fresh: Vec<Marker> = {
            let mut registry = lock(&self.registry);
            candidates
                .into_iter()
                .filter(|marker| registry.claim(session_id, &marker.path))
                .collect()
        };

        let mut outcome = InjectionOutcome::default();
        for marker in fresh {
            let delivered = self.inject_one(session_id, &marker).await;
            let mut registry = lock(&self.registry);
            if delivered {
                registry.confirm(session_id, marker.path.clone());
                outcome.delivered.push(marker);
            } else {
                registry.release(session_id, &marker.path);
                outcome.skipped.push(marker);
            }
        }
        outcome
    }

    /// Returns whether the marker reached the session
    async fn inject_one(&self, session_id: &str, marker: &Marker) -> bool {
        let content = match self.fs.read_to_string(&marker.path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("Skipping {}: {}", marker.path.display(), e);
                return false;
            }
        };

        let rel = marker.display_path();

        let entry = LogEntry {
            service: self.service_name.clone(),
            level: LogLevel::Debug,
            message: format!("Injecting {}", rel),
        };
        if let Err(e) = self.host.log(entry).await {
            warn!("Host log failed for {}: {}", rel, e);
        }

        let toast = Toast {
            message: format!("Injected {}", rel),
            variant: ToastVariant::Info,
        };
        if let Err(e) = self.host.show_toast(toast).await {
            warn!("Toast failed for {}: {}", rel, e);
        }

        let prompt = SessionPrompt {
            session_id: session_id.to_string(),
            no_reply: true,
            content: marker.wrap(&content),
        };
        match self.host.prompt(prompt).await {
            Ok(()) => {
                debug!(session = session_id, marker = %rel, "Injected marker");
                true
            }
            Err(e) => {
                warn!("Delivery of {} to {} failed: {}", rel, session_id, e);
                false
            }
        }
    }

    /// Markers already delivered to a session
    pub fn injected_markers(&self, session_id: &str) -> Vec<PathBuf> {
        lock(&self.registry).injected(session_id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}
