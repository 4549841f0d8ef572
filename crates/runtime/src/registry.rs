//! Injected-marker registry
//!
//! Per-session set of marker paths already delivered. Session entries are
//! created on first delivery and only ever grow.
//!
//! Overlapping completions in one session claim a marker before reading it;
//! a claimed marker is invisible to other completions until it is either
//! confirmed (delivered) or released (read or delivery failed).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct InjectedRegistry {
    sessions: HashMap<String, HashSet<PathBuf>>,
    in_flight: HashMap<String, HashSet<PathBuf>>,
}

impl InjectedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session_id: &str, marker: &Path) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|seen| seen.contains(marker))
    }

    fn is_claimed(&self, session_id: &str, marker: &Path) -> bool {
        self.in_flight
            .get(session_id)
            .is_some_and(|claimed| claimed.contains(marker))
    }

    /// Reserve a marker for delivery; `false` if delivered or already claimed
    pub fn claim(&mut self, session_id: &str, marker: &Path) -> bool {
        if self.contains(session_id, marker) || self.is_claimed(session_id, marker) {
            return false;
        }
        self.in_flight
            .entry(session_id.to_string())
            .or_default()
            .insert(marker.to_path_buf())
    }

    /// Drop a claim without recording a delivery
    pub fn release(&mut self, session_id: &str, marker: &Path) {
        if let Some(claimed) = self.in_flight.get_mut(session_id) {
            claimed.remove(marker);
            if claimed.is_empty() {
                self.in_flight.remove(session_id);
            }
        }
    }

    /// Turn a claim into a delivery
    pub fn confirm(&mut self, session_id: &str, marker: PathBuf) -> bool {
        self.release(session_id, &marker);
        self.mark(session_id, marker)
    }

    /// Returns `false` if the marker was already recorded for the session
    pub fn mark(&mut self, session_id: &str, marker: PathBuf) -> bool {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(marker)
    }

    /// Delivered markers for a session, sorted
    pub fn injected(&self, session_id: &str) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .sessions
            .get(session_id)
            .map(|seen| seen.iter().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
