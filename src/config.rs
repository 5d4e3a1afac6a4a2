//! Configuration management for parquet-assembly.
//!
//! Supports layered configuration: defaults → project → user → explicit file → env

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file, also used to discover the project root
pub const PROJECT_CONFIG_FILE: &str = ".parquet-assembly.toml";

/// Prefix for environment overrides, e.g. `PARQUET_ASSEMBLY__TOOLS__MVN`
pub const ENV_PREFIX: &str = "PARQUET_ASSEMBLY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub artifact: ArtifactConfig,
    #[serde(default)]
    pub marker: MarkerConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub process: ProcessConfig,
}

impl AssemblyConfig {
    /// Load configuration with hierarchy: defaults → project → user → explicit → env
    pub fn load(
        project_root: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Project-specific config (.parquet-assembly.toml in project root)
        if let Some(root) = project_root {
            let project_config = root.join(PROJECT_CONFIG_FILE);
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        // 3. User config (~/.config/parquet-assembly/config.toml)
        if let Some(config_dir) =
            directories::ProjectDirs::from("org", "lightcopy", "parquet-assembly")
        {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. File given on the command line
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // 5. Environment variables (PARQUET_ASSEMBLY__*)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the workflow misbehave silently
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.repository.trim().is_empty() {
            return Err(ConfigError::Invalid("source.repository is empty".to_string()));
        }
        if self.source.subproject.trim().is_empty() {
            return Err(ConfigError::Invalid("source.subproject is empty".to_string()));
        }
        if self.artifact.prefix.is_empty() && self.artifact.suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "artifact.prefix and artifact.suffix cannot both be empty".to_string(),
            ));
        }
        if self.marker.prefix.is_empty() {
            return Err(ConfigError::Invalid("marker.prefix is empty".to_string()));
        }
        if self.tools.git.is_empty() || self.tools.mvn.is_empty() {
            return Err(ConfigError::Invalid("tool names cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Upstream repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote repository to clone
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Sub-project directory built inside the staged tree
    #[serde(default = "default_subproject")]
    pub subproject: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            subproject: default_subproject(),
        }
    }
}

fn default_repository() -> String {
    "https://github.com/apache/parquet-mr".to_string()
}

fn default_subproject() -> String {
    "parquet-tools".to_string()
}

/// Directory layout, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Parent directory of staged working trees
    #[serde(default = "default_staging")]
    pub staging: PathBuf,
    /// Flat directory receiving harvested jars and markers
    #[serde(default = "default_lib")]
    pub lib: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            staging: default_staging(),
            lib: default_lib(),
        }
    }
}

fn default_staging() -> PathBuf {
    PathBuf::from("staging")
}

fn default_lib() -> PathBuf {
    PathBuf::from("lib")
}

/// Build artifact selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_artifact_prefix")]
    pub prefix: String,
    #[serde(default = "default_artifact_suffix")]
    pub suffix: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            prefix: default_artifact_prefix(),
            suffix: default_artifact_suffix(),
        }
    }
}

fn default_artifact_prefix() -> String {
    "parquet-tools".to_string()
}

fn default_artifact_suffix() -> String {
    ".jar".to_string()
}

/// Completion marker naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Leading part of `<prefix>-dist-<tag><suffix>.tag`
    #[serde(default = "default_marker_prefix")]
    pub prefix: String,
    /// Appended after the tag when client mode is enabled
    #[serde(default = "default_client_suffix")]
    pub client_suffix: String,
    /// Distribution name used when no marker is present
    #[serde(default = "default_distribution_name")]
    pub default_name: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            prefix: default_marker_prefix(),
            client_suffix: default_client_suffix(),
            default_name: default_distribution_name(),
        }
    }
}

fn default_marker_prefix() -> String {
    "parquet-tools".to_string()
}

fn default_client_suffix() -> String {
    "-dh".to_string()
}

fn default_distribution_name() -> String {
    "parquet-tools-assembly".to_string()
}

/// Options forwarded to the build tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_skip_tests_option")]
    pub skip_tests_option: String,
    /// Profile enabling the bundled Hadoop dependencies
    #[serde(default = "default_client_profile_option")]
    pub client_profile_option: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            skip_tests_option: default_skip_tests_option(),
            client_profile_option: default_client_profile_option(),
        }
    }
}

fn default_skip_tests_option() -> String {
    "-DskipTests".to_string()
}

fn default_client_profile_option() -> String {
    "-Plocal".to_string()
}

/// External executables, either bare names or explicit paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_mvn")]
    pub mvn: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            mvn: default_mvn(),
        }
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_mvn() -> String {
    "mvn".to_string()
}

/// Subprocess handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// How many trailing stderr lines are kept for error reports
    #[serde(default = "default_stderr_tail_lines")]
    pub stderr_tail_lines: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            stderr_tail_lines: default_stderr_tail_lines(),
        }
    }
}

fn default_stderr_tail_lines() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AssemblyConfig::default();
        assert_eq!(config.source.repository, "https://github.com/apache/parquet-mr");
        assert_eq!(config.source.subproject, "parquet-tools");
        assert_eq!(config.paths.staging, PathBuf::from("staging"));
        assert_eq!(config.paths.lib, PathBuf::from("lib"));
        assert_eq!(config.artifact.prefix, "parquet-tools");
        assert_eq!(config.artifact.suffix, ".jar");
        assert_eq!(config.marker.client_suffix, "-dh");
        assert_eq!(config.build.client_profile_option, "-Plocal");
        assert_eq!(config.tools.mvn, "mvn");
        assert_eq!(config.process.stderr_tail_lines, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "[source]\nsubproject = \"parquet-cli\"\n\n[tools]\nmvn = \"/opt/maven/bin/mvn\"\n",
        )
        .unwrap();

        let config = AssemblyConfig::load(Some(temp.path()), None).unwrap();
        assert_eq!(config.source.subproject, "parquet-cli");
        assert_eq!(config.tools.mvn, "/opt/maven/bin/mvn");
        // untouched keys keep their defaults
        assert_eq!(config.source.repository, "https://github.com/apache/parquet-mr");
        assert_eq!(config.tools.git, "git");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let err = AssemblyConfig::load(None, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_validate_rejects_empty_filter() {
        let mut config = AssemblyConfig::default();
        config.artifact.prefix.clear();
        config.artifact.suffix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
