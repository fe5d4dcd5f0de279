/// Errors that can occur across the Warden service.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the HTTP layer maps variants to status codes (`InvalidInput`
/// -> 400, `NotFound` -> 404, everything else -> 500) and the binary crate
/// converts to a diagnostic at the boundary.
///
/// # Examples
///
/// ```
/// use warden_core::WardenError;
///
/// let err = WardenError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed caller input, such as a repository link without
    /// owner/repo segments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A requested resource does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// GitHub API failure.
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// Slack API failure.
    #[error("Slack error: {0}")]
    Slack(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
