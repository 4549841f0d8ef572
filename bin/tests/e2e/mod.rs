//! agentsmd E2E 测试套件
//!
//! 通过真实二进制覆盖 hook / resolve / config 命令

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

// ============== 基础设施 ==============

/// agentsmd CLI 调用封装
pub struct AgentsmdCli {
    binary: PathBuf,
    project_root: Option<PathBuf>,
}

impl AgentsmdCli {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(env!("CARGO_BIN_EXE_agentsmd")),
            project_root: None,
        }
    }

    pub fn with_project_root(mut self, root: &Path) -> Self {
        self.project_root = Some(root.to_path_buf());
        self
    }

    /// 执行命令，可选写入 stdin
    pub fn run(&self, args: &[&str], stdin: Option<&str>) -> CliResult {
        let mut cmd = Command::new(&self.binary);
        cmd.env_remove("AGENTSMD_PROJECT_ROOT");

        if let Some(root) = &self.project_root {
            cmd.arg("-p").arg(root);
        }
        cmd.args(args);

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn agentsmd");

        {
            let mut pipe = child.stdin.take().expect("stdin piped");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).expect("write stdin");
            }
        }

        let output = child.wait_with_output().expect("wait for agentsmd");
        CliResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// hook 模式：事件逐行输入，返回解析后的宿主指令
    pub fn hook(&self, events: &[Value]) -> Vec<Value> {
        let input: String = events.iter().map(|event| format!("{}\n", event)).collect();
        let result = self.run(&["hook"], Some(&input));
        assert!(result.success, "hook failed: {}", result.stderr);
        result
            .stdout
            .lines()
            .map(|line| serde_json::from_str(line).expect("command is JSON"))
            .collect()
    }
}

pub struct CliResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

// ============== 辅助函数 ==============

fn write_marker(root: &Path, rel_dir: &str, body: &str) {
    let dir = root.join(rel_dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("AGENTS.md"), body).unwrap();
}

fn read_events(call_id: &str, session_id: &str, file_path: &str) -> [Value; 2] {
    [
        serde_json::json!({
            "type": "tool.execute.before",
            "callID": call_id,
            "sessionID": session_id,
            "tool": "read",
            "args": {"filePath": file_path},
        }),
        serde_json::json!({
            "type": "tool.execute.after",
            "callID": call_id,
            "sessionID": session_id,
            "tool": "read",
        }),
    ]
}

fn rel_marker(parts: &[&str]) -> String {
    parts
        .iter()
        .collect::<PathBuf>()
        .join("AGENTS.md")
        .display()
        .to_string()
}

/// 创建带标记文件的临时项目
fn create_test_project() -> (AgentsmdCli, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_marker(temp_dir.path(), "", "root rules");
    write_marker(temp_dir.path(), "a", "alpha rules");
    write_marker(temp_dir.path(), "a/b", "beta rules");

    let cli = AgentsmdCli::new().with_project_root(temp_dir.path());
    (cli, temp_dir)
}

// ============== CLI 基础测试 ==============

#[test]
fn test_cli_help() {
    let result = AgentsmdCli::new().run(&["--help"], None);
    assert!(result.success);
    assert!(result.stdout.contains("hook"));
    assert!(result.stdout.contains("resolve"));
}

#[test]
fn test_cli_invalid_option() {
    let result = AgentsmdCli::new().run(&["--invalid-option"], None);
    assert!(!result.success);
}

// ============== HOOK 测试 ==============

#[test]
fn test_hook_injects_ancestors_in_order() {
    let (cli, _temp_dir) = create_test_project();
    let commands = cli.hook(&read_events("c1", "ses-1", "a/b/c.ext"));

    let prompts: Vec<&Value> = commands
        .iter()
        .filter(|command| command["type"] == "session.prompt")
        .collect();
    assert_eq!(prompts.len(), 2);
    assert_eq!(
        prompts[0]["content"],
        format!("<agents-md path=\"{}\">\nalpha rules\n</agents-md>", rel_marker(&["a"]))
    );
    assert_eq!(
        prompts[1]["content"],
        format!("<agents-md path=\"{}\">\nbeta rules\n</agents-md>", rel_marker(&["a", "b"]))
    );
    assert!(prompts.iter().all(|prompt| prompt["noReply"] == true));

    let toasts = commands
        .iter()
        .filter(|command| command["type"] == "tui.toast")
        .count();
    let logs = commands
        .iter()
        .filter(|command| command["type"] == "app.log")
        .count();
    assert_eq!((toasts, logs), (2, 2));
    assert!(!commands.iter().any(|command| {
        command["content"]
            .as_str()
            .is_some_and(|content| content.contains("root rules"))
    }));
}

#[test]
fn test_hook_dedups_within_session_only() {
    let (cli, _temp_dir) = create_test_project();
    let mut events = Vec::new();
    events.extend(read_events("c1", "ses-1", "a/x.rs"));
    events.extend(read_events("c2", "ses-1", "a/y.rs"));
    events.extend(read_events("c3", "ses-2", "a/x.rs"));

    let commands = cli.hook(&events);
    let sessions: Vec<&str> = commands
        .iter()
        .filter(|command| command["type"] == "session.prompt")
        .filter_map(|command| command["sessionId"].as_str())
        .collect();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.contains(&"ses-1"));
    assert!(sessions.contains(&"ses-2"));
}

#[test]
fn test_hook_outside_root_and_garbage_are_silent() {
    let (cli, _temp_dir) = create_test_project();
    let outside = TempDir::new().unwrap();
    write_marker(outside.path(), "x", "foreign");

    let mut events = Vec::new();
    events.push(serde_json::json!("not an event"));
    let foreign = outside.path().join("x/file.rs");
    events.extend(read_events("c1", "ses-1", &foreign.display().to_string()));
    events.extend(read_events("c2", "ses-1", "top-level.rs"));

    assert!(cli.hook(&events).is_empty());
}

// ============== RESOLVE / CONFIG 测试 ==============

#[test]
fn test_resolve_lists_markers() {
    let (cli, _temp_dir) = create_test_project();
    let result = cli.run(&["resolve", "a/b/c.ext"], None);
    assert!(result.success);
    let lines: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(lines, vec![rel_marker(&["a"]), rel_marker(&["a", "b"])]);
}

#[test]
fn test_config_prints_yaml() {
    let (cli, temp_dir) = create_test_project();
    let result = cli.run(&["config"], None);
    assert!(result.success);
    assert!(result.stdout.contains("service_name: directory-agents-injector"));
    assert!(result.stdout.contains(&temp_dir.path().display().to_string()));
}
