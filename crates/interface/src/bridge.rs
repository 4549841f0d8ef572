//! Hook bridge - JSON lines between a host process and the coordinator
//!
//! Input: one host event per line (`tool.execute.before` /
//! `tool.execute.after`). Output: one host command per line
//! (`app.log`, `tui.toast`, `session.prompt`).
//!
//! Completions are spawned so unrelated reads may overlap; markers of a
//! single read are still delivered in order by the coordinator.

use agentsmd_core::{InjectError, InjectResult, InjectorConfig};
use agentsmd_runtime::{
    HostClient, HostCommand, InjectionCoordinator, LogEntry, SessionPrompt, Toast,
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Tool invocation as reported by the host
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "callID")]
    pub call_id: String,

    #[serde(rename = "sessionID")]
    pub session_id: String,

    pub tool: String,

    #[serde(default)]
    pub args: Value,
}

/// Inbound host event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    #[serde(rename = "tool.execute.before")]
    ToolBefore(ToolCall),

    #[serde(rename = "tool.execute.after")]
    ToolAfter(ToolCall),
}

/// Host client that writes each command as a JSON line
pub struct JsonLinesHost<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesHost<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Exclusive access to the underlying writer
    pub async fn writer(&self) -> tokio::sync::MutexGuard<'_, W> {
        self.writer.lock().await
    }

    async fn send(&self, command: HostCommand) -> InjectResult<()> {
        let mut line =
            serde_json::to_string(&command).map_err(|e| InjectError::Delivery(e.to_string()))?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| InjectError::Delivery(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| InjectError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl<W> HostClient for JsonLinesHost<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn log(&self, entry: LogEntry) -> InjectResult<()> {
        self.send(HostCommand::Log(entry)).await
    }

    async fn show_toast(&self, toast: Toast) -> InjectResult<()> {
        self.send(HostCommand::Toast(toast)).await
    }

    async fn prompt(&self, prompt: SessionPrompt) -> InjectResult<()> {
        self.send(HostCommand::Prompt(prompt)).await
    }
}

/// Counters for one bridge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub events: usize,
    pub ignored: usize,
    pub recorded: usize,
    pub injected: usize,
}

/// Routes host events into an [`InjectionCoordinator`]
pub struct HookBridge {
    coordinator: Arc<InjectionCoordinator>,
    config: InjectorConfig,
}

impl HookBridge {
    pub fn new(coordinator: Arc<InjectionCoordinator>, config: InjectorConfig) -> Self {
        Self {
            coordinator,
            config,
        }
    }

    /// First non-empty string argument among the configured keys
    pub fn extract_path(&self, args: &Value) -> Option<String> {
        self.config
            .path_arg_keys
            .iter()
            .filter_map(|key| args.get(key).and_then(Value::as_str))
            .find(|path| !path.trim().is_empty())
            .map(str::to_string)
    }

    /// Record the target of a tracked read; returns whether it was recorded
    pub fn handle_before(&self, call: &ToolCall) -> bool {
        if !self.config.is_tracked_tool(&call.tool) {
            return false;
        }
        match self.extract_path(&call.args) {
            Some(path) => {
                self.coordinator.record_pending_read(&call.call_id, &path);
                true
            }
            None => {
                debug!("{} call {} has no path argument", call.tool, call.call_id);
                false
            }
        }
    }

    /// Consume events until EOF, then wait for outstanding completions
    pub async fn run<R>(&self, input: R) -> anyhow::Result<BridgeStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut stats = BridgeStats::default();
        let mut completions = JoinSet::new();
        let mut lines = input.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .context("failed to read host event")?
        {
            if line.trim().is_empty() {
                continue;
            }
            stats.events += 1;

            let event: HostEvent = match serde_json::from_str(&line) {
                Ok(event) => event,
                Err(e) => {
                    debug!("Ignoring host event: {}", e);
                    stats.ignored += 1;
                    continue;
                }
            };

            match event {
                HostEvent::ToolBefore(call) => {
                    if self.handle_before(&call) {
                        stats.recorded += 1;
                    }
                }
                HostEvent::ToolAfter(call) => {
                    if !self.config.is_tracked_tool(&call.tool) {
                        continue;
                    }
                    let coordinator = self.coordinator.clone();
                    completions.spawn(async move {
                        coordinator
                            .complete_read(&call.call_id, &call.session_id)
                            .await
                    });
                }
            }
        }

        while let Some(joined) = completions.join_next().await {
            match joined {
                Ok(outcome) => stats.injected += outcome.delivered.len(),
                Err(e) => warn!("Completion task failed: {}", e),
            }
        }

        info!(
            events = stats.events,
            recorded = stats.recorded,
            injected = stats.injected,
            "Hook bridge finished"
        );
        Ok(stats)
    }
}
