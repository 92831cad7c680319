use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name of the optional project config, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "ritemap.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_true")]
    pub collapse: bool,
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            output: default_output(),
            collapse: default_true(),
            trace: TraceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Fail on unrecognized action keys instead of warning.
    #[serde(default)]
    pub strict: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_collapse: bool,
    pub strict: bool,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .map_err(|source| ConfigError::Parse { path, source })?;
    Ok(config)
}

/// Load the project config and apply CLI overrides.
///
/// Relative paths are resolved against `project_root`.
pub fn resolve_config(project_root: &Path, overrides: &Overrides) -> Result<ProjectConfig> {
    let mut config = load_project_config(project_root)?;

    if let Some(dir) = &overrides.config_dir {
        config.config_dir.clone_from(dir);
    }
    if let Some(output) = &overrides.output {
        config.output.clone_from(output);
    }
    if overrides.no_collapse {
        config.collapse = false;
    }
    if overrides.strict {
        config.trace.strict = true;
    }

    config.config_dir = anchor(project_root, &config.config_dir);
    config.output = anchor(project_root, &config.output);
    Ok(config)
}

fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_output() -> PathBuf {
    PathBuf::from("graph.json")
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config, ProjectConfig::default());
        assert!(config.collapse);
        assert!(!config.trace.strict);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "output = \"out/edges.json\"\n[trace]\nstrict = true\n",
        )
        .expect("write config");

        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config.output, PathBuf::from("out/edges.json"));
        assert_eq!(config.config_dir, PathBuf::from("config"));
        assert!(config.collapse);
        assert!(config.trace.strict);
    }

    #[test]
    fn invalid_file_reports_path_and_code() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "collapse = maybe").expect("write");
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));

        let config_err = err.downcast_ref::<ConfigError>().expect("typed config error");
        assert_eq!(config_err.code(), ErrorCode::ConfigParse);
    }

    #[test]
    fn overrides_win_and_paths_are_anchored() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "collapse = true").expect("write");

        let config = resolve_config(
            dir.path(),
            &Overrides {
                config_dir: Some(PathBuf::from("data")),
                output: None,
                no_collapse: true,
                strict: true,
            },
        )
        .expect("resolve");

        assert_eq!(config.config_dir, dir.path().join("data"));
        assert_eq!(config.output, dir.path().join("graph.json"));
        assert!(!config.collapse);
        assert!(config.trace.strict);
    }
}
