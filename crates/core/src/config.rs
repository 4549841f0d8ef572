//! agentsmd configuration
//!
//! Loaded from a YAML file; every field has a default so an empty or
//! missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InjectError, InjectResult};

/// Config file looked up in the project root when none is given explicitly
pub const CONFIG_FILENAME: &str = ".agentsmd.yaml";

/// Default `service` of host log entries
pub const DEFAULT_SERVICE_NAME: &str = "directory-agents-injector";

/// Injector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Project root; falls back to the working directory
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    /// `service` field of host log entries
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Tools whose invocations are tracked as reads (case-insensitive)
    #[serde(default = "default_tracked_tools")]
    pub tracked_tools: Vec<String>,

    /// Argument keys probed, in order, for the target file path
    #[serde(default = "default_path_arg_keys")]
    pub path_arg_keys: Vec<String>,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_tracked_tools() -> Vec<String> {
    vec!["read".to_string()]
}

fn default_path_arg_keys() -> Vec<String> {
    vec![
        "filePath".to_string(),
        "file_path".to_string(),
        "path".to_string(),
    ]
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            service_name: default_service_name(),
            tracked_tools: default_tracked_tools(),
            path_arg_keys: default_path_arg_keys(),
        }
    }
}

impl InjectorConfig {
    pub fn from_yaml_str(raw: &str) -> InjectResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file
    pub fn load(path: &Path) -> InjectResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| InjectError::io(path, e))?;
        Self::from_yaml_str(&raw)
    }

    /// Load `<dir>/.agentsmd.yaml` if present, defaults otherwise
    pub fn discover(dir: &Path) -> InjectResult<Self> {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> InjectResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(InjectError::Config("service_name must not be empty".to_string()));
        }
        if self.path_arg_keys.is_empty() {
            return Err(InjectError::Config(
                "path_arg_keys needs at least one key".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute project root: the configured one (relative values are taken
    /// against `cwd`) or `cwd` itself
    pub fn effective_project_root(&self, cwd: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }

    pub fn is_tracked_tool(&self, tool: &str) -> bool {
        self.tracked_tools
            .iter()
            .any(|tracked| tracked.eq_ignore_ascii_case(tool))
    }

    pub fn to_yaml(&self) -> InjectResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = InjectorConfig::from_yaml_str("").unwrap();
        assert_eq!(config, InjectorConfig::default());
        assert_eq!(config.service_name, "directory-agents-injector");
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = InjectorConfig::from_yaml_str("tracked_tools: [Read, view]\n").unwrap();
        assert!(config.is_tracked_tool("read"));
        assert!(config.is_tracked_tool("VIEW"));
        assert!(!config.is_tracked_tool("write"));
        assert_eq!(config.path_arg_keys, default_path_arg_keys());
    }

    #[test]
    fn test_invalid_yaml_and_values_are_rejected() {
        assert!(matches!(
            InjectorConfig::from_yaml_str("tracked_tools: 5"),
            Err(InjectError::Yaml(_))
        ));
        assert!(matches!(
            InjectorConfig::from_yaml_str("path_arg_keys: []"),
            Err(InjectError::Config(_))
        ));
        assert!(matches!(
            InjectorConfig::from_yaml_str("service_name: '  '"),
            Err(InjectError::Config(_))
        ));
    }

    #[test]
    fn test_discover_reads_project_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            InjectorConfig::discover(temp_dir.path()).unwrap(),
            InjectorConfig::default()
        );

        std::fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            "service_name: custom-injector\n",
        )
        .unwrap();
        let config = InjectorConfig::discover(temp_dir.path()).unwrap();
        assert_eq!(config.service_name, "custom-injector");
    }

    #[test]
    fn test_effective_project_root() {
        let cwd = Path::new("/work");
        let mut config = InjectorConfig::default();
        assert_eq!(config.effective_project_root(cwd), PathBuf::from("/work"));

        config.project_root = Some(PathBuf::from("repo"));
        assert_eq!(config.effective_project_root(cwd), PathBuf::from("/work/repo"));

        config.project_root = Some(PathBuf::from("/abs/repo"));
        assert_eq!(config.effective_project_root(cwd), PathBuf::from("/abs/repo"));
    }
}
