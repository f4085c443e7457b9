// ABOUTME: Configuration management for analysis-wizard
// Layered TOML config: built-in defaults, user config, project config, explicit path

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wizard::reveal::RevealTiming;
use crate::wizard::validation::{FileSizePolicy, DEFAULT_MAX_FILE_SIZE};
use crate::wizard::WizardOptions;

/// Name of the per-project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "analysis-wizard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Wizard behaviour
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Prompt reveal animation
    #[serde(default)]
    pub reveal: RevealConfig,

    /// Submission transport
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Terminal UI
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Reject file selections containing any file larger than `max_file_size_bytes`
    #[serde(default)]
    pub enforce_file_size_limit: bool,

    /// Per-file size cap used when the limit is enforced (default: 5 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Whether Esc navigates to the previous step
    #[serde(default = "default_true")]
    pub allow_back_navigation: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            enforce_file_size_limit: false,
            max_file_size_bytes: default_max_file_size(),
            allow_back_navigation: default_true(),
        }
    }
}

impl WizardConfig {
    pub fn file_size_policy(&self) -> FileSizePolicy {
        FileSizePolicy::from_config(self.enforce_file_size_limit, self.max_file_size_bytes)
    }

    pub fn options(&self) -> WizardOptions {
        WizardOptions {
            file_policy: self.file_size_policy(),
            allow_back_navigation: self.allow_back_navigation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Animate step prompts; when false they appear at once
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_char_interval")]
    pub char_interval_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            initial_delay_ms: default_initial_delay(),
            char_interval_ms: default_char_interval(),
        }
    }
}

impl RevealConfig {
    pub fn timing(&self) -> RevealTiming {
        RevealTiming {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            char_interval: Duration::from_millis(self.char_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    #[default]
    Simulated,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub mode: SubmissionMode,

    /// Target URL for `mode = "http"`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Artificial latency of the simulated transport (default: 1500ms)
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,

    /// When set, the simulated transport fails with this reason
    #[serde(default)]
    pub simulated_failure: Option<String>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            mode: SubmissionMode::default(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            simulated_latency_ms: default_simulated_latency(),
            simulated_failure: None,
        }
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event loop tick in milliseconds (default: 50ms)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_initial_delay() -> u64 {
    300
}

fn default_char_interval() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_simulated_latency() -> u64 {
    1500
}

fn default_tick_rate() -> u64 {
    50
}

impl AppConfig {
    /// Load configuration from default locations, then `explicit` if given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut paths = Self::get_config_paths();
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
            paths.push(path.to_path_buf());
        }
        Self::load_from_paths(&paths)
    }

    /// Merge the given files in order; later files win key by key
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        for path in paths {
            if !path.exists() {
                continue;
            }

            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let value: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;

            tracing::debug!("Loaded config layer from {}", path.display());
            merge_values(&mut merged, value);
        }

        let config: AppConfig = merged
            .try_into()
            .context("Invalid configuration values")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the wizard cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.wizard.max_file_size_bytes == 0 {
            return Err(anyhow!("wizard.max_file_size_bytes must be greater than zero"));
        }

        if self.submission.mode == SubmissionMode::Http {
            let endpoint = self
                .submission
                .endpoint
                .as_deref()
                .ok_or_else(|| anyhow!("submission.endpoint is required when mode = \"http\""))?;
            crate::transport::http::parse_endpoint(endpoint)?;
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(anyhow!("ui.tick_rate_ms must be greater than zero"));
        }

        Ok(())
    }

    /// Path of the user config file (~/.analysis-wizard/config.toml)
    pub fn user_config_path() -> Result<PathBuf> {
        Ok(Self::get_user_config_dir()?.join("config.toml"))
    }

    /// Write this configuration as TOML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Get configuration file paths in order of precedence (lowest first)
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. User config (~/.analysis-wizard/config.toml)
        if let Ok(path) = Self::user_config_path() {
            paths.push(path);
        }

        // 2. Project config in the working directory
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(PROJECT_CONFIG_FILE));
        }

        paths
    }

    /// Base directory for config and logs
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".analysis-wizard"))
    }

    fn get_user_config_dir() -> Result<PathBuf> {
        Self::base_dir()
    }
}

/// Recursively merge `overlay` into `base`; tables merge, everything else replaces
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
