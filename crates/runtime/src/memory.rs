//! In-memory host implementation
//!
//! Records every call instead of forwarding it. Used by dry runs and tests.

use agentsmd_core::{InjectError, InjectResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::host::{HostClient, HostCommand, LogEntry, SessionPrompt, SharedHost, Toast};

/// Host that keeps every command in order
#[derive(Debug, Default)]
pub struct RecordingHost {
    commands: Mutex<Vec<HostCommand>>,
    reject_prompts: AtomicBool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `prompt` calls fail (they are still not recorded)
    pub fn set_reject_prompts(&self, reject: bool) {
        self.reject_prompts.store(reject, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<HostCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn prompts(&self) -> Vec<SessionPrompt> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                HostCommand::Prompt(prompt) => Some(prompt),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                HostCommand::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                HostCommand::Log(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: HostCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

#[async_trait]
impl HostClient for RecordingHost {
    async fn log(&self, entry: LogEntry) -> InjectResult<()> {
        self.push(HostCommand::Log(entry));
        Ok(())
    }

    async fn show_toast(&self, toast: Toast) -> InjectResult<()> {
        self.push(HostCommand::Toast(toast));
        Ok(())
    }

    async fn prompt(&self, prompt: SessionPrompt) -> InjectResult<()> {
        if self.reject_prompts.load(Ordering::SeqCst) {
            return Err(InjectError::Delivery(format!(
                "session {} rejected prompt",
                prompt.session_id
            )));
        }
        self.push(HostCommand::Prompt(prompt));
        Ok(())
    }
}

/// Create a new shared recording host
pub fn create_recording_host() -> (Arc<RecordingHost>, SharedHost) {
    let host = Arc::new(RecordingHost::new());
    let shared: SharedHost = host.clone();
    (host, shared)
}
