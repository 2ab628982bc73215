//! Configuration model for revet.
//!
//! This module defines the Config struct that represents an optional
//! `.revet.yaml` in the working directory. It supports forward-compatible
//! YAML parsing (unknown fields are ignored), sensible defaults for every
//! field, and validation of config values. There are no process-wide
//! mutable defaults: commands load one Config, apply CLI overrides, and
//! pass it down explicitly.

use crate::diff::{EngineOptions, ExcludeRule, PathMatcher};
use crate::error::{Result, RevetError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".revet.yaml";

fn default_model() -> String {
    "qwen-plus".to_string()
}

fn default_api_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_api_key_env() -> String {
    "DASHSCOPE_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_diff_chars() -> usize {
    60_000
}

fn default_gh_command() -> String {
    "gh".to_string()
}

/// Default test-file exclusion rules.
///
/// The host repositories this tool grew up around are Go projects, where
/// test files end in `_test.go`; the suffix+substring form also catches
/// files under `test/` directories.
pub fn default_test_file_rules() -> Vec<ExcludeRule> {
    vec![ExcludeRule {
        suffix: ".go".to_string(),
        substring: "test".to_string(),
    }]
}

fn default_true() -> bool {
    true
}

/// Configuration for a review run.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Model settings
    // =========================================================================
    /// Model name sent to the chat-completions endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature for the review request.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout for the model call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // =========================================================================
    // Diff settings
    // =========================================================================
    /// Maximum diff size in characters before head/tail truncation.
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,

    /// Test-file exclusion rules (suffix + substring, case-insensitive).
    #[serde(default = "default_test_file_rules")]
    pub test_file_rules: Vec<ExcludeRule>,

    /// Additional glob patterns excluded from review (e.g. `vendor/**`).
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Whether to drop blocks whose only changes are whitespace.
    #[serde(default = "default_true")]
    pub exclude_blank: bool,

    // =========================================================================
    // Host settings
    // =========================================================================
    /// Command line used to invoke the GitHub CLI. May carry leading
    /// arguments, e.g. a wrapper script.
    #[serde(default = "default_gh_command")]
    pub gh_command: String,

    /// Whether to append review events to the local NDJSON log.
    #[serde(default = "default_true")]
    pub log_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            max_diff_chars: default_max_diff_chars(),
            test_file_rules: default_test_file_rules(),
            exclude_paths: Vec::new(),
            exclude_blank: true,
            gh_command: default_gh_command(),
            log_events: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `RevetError::UserError` if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RevetError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            RevetError::UserError(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `.revet.yaml` from the working directory, or fall back to
    /// defaults when no file exists. A file that exists but cannot be
    /// parsed is an error, never silently ignored.
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(RevetError::UserError(
                "config error: model must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RevetError::UserError(format!(
                "config error: temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.max_diff_chars == 0 {
            return Err(RevetError::UserError(
                "config error: max_diff_chars must be positive".to_string(),
            ));
        }
        if self.gh_command.trim().is_empty() {
            return Err(RevetError::UserError(
                "config error: gh_command must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the engine options for this configuration.
    ///
    /// Compiles the path matcher; a bad glob pattern surfaces here as a
    /// config error.
    pub fn engine_options(&self) -> Result<EngineOptions> {
        Ok(EngineOptions {
            max_chars: self.max_diff_chars,
            matcher: PathMatcher::new(self.test_file_rules.clone(), &self.exclude_paths)?,
            filter_blank: self.exclude_blank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "qwen-plus");
        assert_eq!(config.max_diff_chars, 60_000);
        assert_eq!(config.test_file_rules.len(), 1);
        assert!(config.exclude_blank);
        assert!(config.log_events);
    }

    #[test]
    fn load_or_default_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.model, Config::default().model);
    }

    #[test]
    fn load_parses_partial_yaml_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "model: qwen-max\nmax_diff_chars: 1000\nexclude_paths:\n  - 'vendor/**'\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.model, "qwen-max");
        assert_eq!(config.max_diff_chars, 1000);
        assert_eq!(config.exclude_paths, vec!["vendor/**"]);
        // Untouched fields keep their defaults.
        assert_eq!(config.api_key_env, "DASHSCOPE_API_KEY");
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn load_ignores_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "model: qwen-max\nfuture_option: true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.model, "qwen-max");
    }

    #[test]
    fn load_rejects_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "model: [unclosed\n").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn load_parses_test_file_rules() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "test_file_rules:\n  - suffix: '.py'\n    substring: 'test'\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.test_file_rules.len(), 1);
        assert_eq!(config.test_file_rules[0].suffix, ".py");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_diff_chars = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn engine_options_compile_from_config() {
        let mut config = Config::default();
        config.exclude_paths = vec!["vendor/**".to_string()];
        let options = config.engine_options().unwrap();
        assert_eq!(options.max_chars, 60_000);
        assert!(options.matcher.is_excluded("vendor/mod.go"));
        assert!(options.matcher.is_excluded("pkg/db_test.go"));
    }

    #[test]
    fn engine_options_reject_bad_glob() {
        let mut config = Config::default();
        config.exclude_paths = vec!["bad[".to_string()];
        assert!(config.engine_options().is_err());
    }
}
