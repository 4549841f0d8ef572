//! Host collaborator interface
//!
//! The host owns the conversation transport, the toast surface and its own
//! structured log. The coordinator talks to all three through [`HostClient`].
//! Payloads serialize to the JSON shapes the host expects.

use agentsmd_core::InjectResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Host log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured entry for the host's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub service: String,
    pub level: LogLevel,
    pub message: String,
}

/// Toast variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Info,
    Success,
    Warning,
    Error,
}

/// User-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub variant: ToastVariant,
}

/// Message pushed into a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrompt {
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// The message informs the agent and must not trigger a reply
    #[serde(rename = "noReply")]
    pub no_reply: bool,

    pub content: String,
}

/// One outbound call to the host, tagged for line-oriented transports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    #[serde(rename = "app.log")]
    Log(LogEntry),

    #[serde(rename = "tui.toast")]
    Toast(Toast),

    #[serde(rename = "session.prompt")]
    Prompt(SessionPrompt),
}

/// Host client - every call is fallible and treated as best-effort
#[async_trait]
pub trait HostClient: Send + Sync {
    async fn log(&self, entry: LogEntry) -> InjectResult<()>;

    async fn show_toast(&self, toast: Toast) -> InjectResult<()>;

    async fn prompt(&self, prompt: SessionPrompt) -> InjectResult<()>;
}

/// Shared host reference
pub type SharedHost = Arc<dyn HostClient>;
