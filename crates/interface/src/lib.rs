//! agentsmd Interface - 交互层
//!
//! 职责：
//! - CLI 命令行工具
//! - Hook 桥接：宿主工具事件 (stdin) → 注入指令 (stdout)
//!
//! 架构：
//! - cli: 命令行接口
//! - bridge: JSON lines 宿主桥接

pub mod bridge;
pub mod cli;


pub use bridge::{BridgeStats, HookBridge, HostEvent, JsonLinesHost, ToolCall};
pub use cli::{CliConfig, CliError, run_cli};
