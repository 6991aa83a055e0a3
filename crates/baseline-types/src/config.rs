//! Configuration loading for perf-baselines.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/perf-baselines/config.{toml,json,yaml}.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SettingsError;
use crate::guest::KernelVersion;
use crate::hardware::CpuModel;
use crate::test_case::TestFamily;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding `test_<family>_config_<kernel>.json` files,
    /// relative to the repository root for revision comparisons
    #[serde(default = "default_baseline_directory")]
    pub baseline_directory: String,

    /// Path the comparison report is written to
    #[serde(default = "default_output")]
    pub output: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Git repository used for revision comparisons
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Test families compared when none are given on the command line
    #[serde(default = "default_tests")]
    pub tests: Vec<TestFamily>,

    /// Host kernels compared when none are given on the command line
    #[serde(default = "default_kernels")]
    pub kernels: Vec<KernelVersion>,

    /// CPU codenames compared when none are given; the first is the basis
    #[serde(default = "default_codenames")]
    pub codenames: Vec<CpuModel>,
}

fn default_baseline_directory() -> String {
    "tests/integration_tests/performance/configs".to_string()
}

fn default_output() -> String {
    "comparison_result.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_repository() -> String {
    ".".to_string()
}

fn default_tests() -> Vec<TestFamily> {
    TestFamily::ALL.to_vec()
}

fn default_kernels() -> Vec<KernelVersion> {
    KernelVersion::ALL.to_vec()
}

fn default_codenames() -> Vec<CpuModel> {
    CpuModel::ALL.to_vec()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baseline_directory: default_baseline_directory(),
            output: default_output(),
            log_level: default_log_level(),
            repository: default_repository(),
            tests: default_tests(),
            kernels: default_kernels(),
            codenames: default_codenames(),
        }
    }
}

/// `BASELINES_*` environment layer.
///
/// Format: BASELINES_OUTPUT, BASELINES_LOG_LEVEL, BASELINES_BASELINE_DIRECTORY.
/// The selection lists are comma separated, e.g. `BASELINES_CODENAMES=milan,icelake`.
fn environment() -> Environment {
    Environment::with_prefix("BASELINES")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("tests")
        .with_list_parse_key("kernels")
        .with_list_parse_key("codenames")
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/perf-baselines/config.*)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (BASELINES_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SettingsError> {
        let config_dir = ProjectDirs::from("", "", "perf-baselines")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("baseline_directory", default_baseline_directory())?
            .set_default("output", default_output())?
            .set_default("log_level", default_log_level())?
            .set_default("repository", default_repository())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(environment());

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make every comparison empty.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tests.is_empty() {
            return Err(SettingsError::Invalid("tests must not be empty".to_string()));
        }
        if self.kernels.is_empty() {
            return Err(SettingsError::Invalid("kernels must not be empty".to_string()));
        }
        if self.codenames.is_empty() {
            return Err(SettingsError::Invalid(
                "codenames must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Baseline directory resolved against the configured repository.
    pub fn repository_baseline_directory(&self) -> PathBuf {
        PathBuf::from(&self.repository).join(&self.baseline_directory)
    }
}
