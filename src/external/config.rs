use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// What the reconciler does when a scoring call fails outright.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScorerFailurePolicy {
    /// Stop the run and report the error
    #[default]
    Abort,
    /// Score the record's external signal as 0 and continue
    Skip,
}

/// External scorer settings.
///
/// Example YAML:
/// ```yaml
/// scorer:
///   model: claude-3-5-sonnet-20240620
///   max_tokens: 100
///   timeout: 30s
///   max_retries: 2
///   on_failure: skip
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScorerConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout, e.g. "30s". Unset leaves the HTTP client default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Extra attempts for transient failures. 0 means exactly one call per record.
    #[serde(default)]
    pub max_retries: usize,

    #[serde(default)]
    pub on_failure: ScorerFailurePolicy,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            timeout: None,
            max_retries: 0,
            on_failure: ScorerFailurePolicy::default(),
        }
    }
}

impl ScorerConfig {
    /// Parsed request timeout, if one is configured.
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        match &self.timeout {
            Some(s) => Ok(Some(humantime::parse_duration(s.trim())?)),
            None => Ok(None),
        }
    }
}

/// Validate scorer configuration at startup, collecting every problem.
pub fn validate_scorer(config: &ScorerConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.model.trim().is_empty() {
        errors.push("scorer.model: must not be empty".to_string());
    }

    if config.max_tokens == 0 {
        errors.push("scorer.max_tokens: must be greater than zero".to_string());
    }

    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        errors.push(format!(
            "scorer.base_url: '{}' must start with http:// or https://",
            config.base_url
        ));
    }

    if let Some(ref timeout) = config.timeout {
        if let Err(e) = humantime::parse_duration(timeout.trim()) {
            errors.push(format!("scorer.timeout: invalid '{}' - {}", timeout, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
