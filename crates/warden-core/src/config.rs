use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WardenError;

/// Top-level configuration loaded from `warden.toml`.
///
/// Resolution is layered: CLI flags > environment variables > config file >
/// defaults. The environment overlay ([`WardenConfig::apply_env`]) only fills
/// fields the file left unset, so a token committed to the config file (not
/// recommended) wins over the environment.
///
/// # Examples
///
/// ```
/// use warden_core::WardenConfig;
///
/// let config = WardenConfig::default();
/// assert_eq!(config.server.history_capacity, 50);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Slack notification settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl WardenConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Io`] if the file cannot be read, or
    /// [`WardenError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use warden_core::WardenConfig;
    /// use std::path::Path;
    ///
    /// let config = WardenConfig::from_file(Path::new("warden.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, WardenError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::WardenConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// model = "gpt-4o-mini"
    /// "#;
    /// let config = WardenConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.model, "gpt-4o-mini");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, WardenError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Fill unset credential fields from the process environment.
    ///
    /// Reads `GITHUB_TOKEN`, `SLACK_TOKEN`, `SLACK_CHANNEL`, and
    /// `LLM_API_KEY` (with `GROQ_API_KEY` as a fallback).
    pub fn apply_env(&mut self) {
        if self.github.token.is_none() {
            self.github.token = std::env::var("GITHUB_TOKEN").ok();
        }
        if self.slack.token.is_none() {
            self.slack.token = std::env::var("SLACK_TOKEN").ok();
        }
        if self.slack.channel.is_none() {
            self.slack.channel = std::env::var("SLACK_CHANNEL").ok();
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GROQ_API_KEY"))
                .ok();
        }
    }
}

/// GitHub API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token used for PR lookups and comments.
    pub token: Option<String>,
    /// Base URL for the GitHub REST API.
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
}

fn default_github_api_base() -> String {
    "https://api.github.com".into()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_github_api_base(),
        }
    }
}

/// Slack notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token used for `chat.postMessage`.
    pub token: Option<String>,
    /// Channel ID or name that receives review notifications.
    pub channel: Option<String>,
    /// Base URL for the Slack Web API.
    #[serde(default = "default_slack_api_base")]
    pub api_base: String,
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".into()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            channel: None,
            api_base: default_slack_api_base(),
        }
    }
}

/// LLM provider configuration.
///
/// Any OpenAI-compatible chat completions endpoint works; the defaults
/// target Groq.
///
/// # Examples
///
/// ```
/// use warden_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "llama-3.3-70b-versatile");
/// assert_eq!(config.timeout_secs, 120);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"groq"`, `"openai"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 120).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "groq".into()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to (default: `0.0.0.0:8000`).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Maximum number of review records kept in history (default: 50).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_history_capacity() -> usize {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            history_capacity: default_history_capacity(),
        }
    }
}
