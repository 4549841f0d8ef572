//! Pending read table
//!
//! Carries the raw target path of a read from its "before" hook to its
//! "after" hook. Entries are consumed exactly once.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PendingReads {
    paths: HashMap<String, String>,
}

impl PendingReads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the raw path for an operation, replacing any previous value
    pub fn record(&mut self, operation_id: impl Into<String>, raw_path: impl Into<String>) {
        self.paths.insert(operation_id.into(), raw_path.into());
    }

    /// Remove and return the raw path for an operation
    pub fn take(&mut self, operation_id: &str) -> Option<String> {
        self.paths.remove(operation_id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
