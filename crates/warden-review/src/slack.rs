use serde::Deserialize;
use warden_core::{SlackConfig, WardenError};

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

/// Slack client that posts review notifications to one configured channel.
pub struct SlackClient {
    http: reqwest::Client,
    token: String,
    channel: String,
    api_base: String,
}

impl SlackClient {
    /// Create a client from configuration, falling back to the
    /// `SLACK_TOKEN` and `SLACK_CHANNEL` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Config`] if the token or channel is missing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use warden_core::SlackConfig;
    /// use warden_review::slack::SlackClient;
    ///
    /// let config = SlackConfig {
    ///     token: Some("xoxb-xxxx".into()),
    ///     channel: Some("#code-reviews".into()),
    ///     ..SlackConfig::default()
    /// };
    /// let client = SlackClient::new(&config).unwrap();
    /// ```
    pub fn new(config: &SlackConfig) -> Result<Self, WardenError> {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("SLACK_TOKEN").ok())
            .ok_or_else(|| {
                WardenError::Config(
                    "SLACK_TOKEN not set. Add [slack].token to warden.toml or set SLACK_TOKEN"
                        .into(),
                )
            })?;
        let channel = config
            .channel
            .clone()
            .or_else(|| std::env::var("SLACK_CHANNEL").ok())
            .ok_or_else(|| {
                WardenError::Config(
                    "SLACK_CHANNEL not set. Add [slack].channel to warden.toml or set SLACK_CHANNEL"
                        .into(),
                )
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            token,
            channel,
            api_base: config.api_base.clone(),
        })
    }

    /// Send a message to the configured channel.
    ///
    /// Slack answers `chat.postMessage` with HTTP 200 even for failures and
    /// reports the outcome in the `ok`/`error` body fields, so both layers
    /// are checked.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Slack`] on transport errors or when Slack
    /// reports `ok: false`.
    pub async fn send_message(&self, text: &str) -> Result<String, WardenError> {
        let url = format!("{}/chat.postMessage", self.api_base);
        let payload = serde_json::json!({
            "channel": self.channel,
            "text": text,
        });

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| WardenError::Slack(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WardenError::Slack(format!(
                "Slack API error {status}: {body}"
            )));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| WardenError::Slack(format!("failed to parse response: {e}")))?;

        if body.ok {
            Ok("Slack message sent successfully.".to_string())
        } else {
            Err(WardenError::Slack(format!(
                "failed to send Slack message: {}",
                body.error.unwrap_or_else(|| "unknown error".into())
            )))
        }
    }
}
