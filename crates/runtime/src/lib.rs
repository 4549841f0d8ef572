//! agentsmd Runtime - 注入协调
//!
//! 职责：
//! - 关联读取操作的 before/after 两个阶段
//! - 按会话去重已注入的 AGENTS.md
//! - 通过宿主客户端投递日志、提示与会话消息
//!
//! 架构：
//! - coordinator: InjectionCoordinator
//! - pending / registry: 两张状态表
//! - host: 宿主接口与载荷
//! - memory: 记录型宿主实现

pub mod coordinator;
pub mod host;
pub mod memory;
pub mod pending;
pub mod registry;

pub use coordinator::{InjectionCoordinator, InjectionOutcome};
pub use host::{
    HostClient, HostCommand, LogEntry, LogLevel, SessionPrompt, SharedHost, Toast, ToastVariant,
};
pub use memory::{RecordingHost, create_recording_host};
pub use pending::PendingReads;
pub use registry::InjectedRegistry;
