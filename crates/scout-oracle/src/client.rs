//! HTTP client for an OpenAI-compatible chat-completions provider.
//!
//! One [`ChatClient`] holds one API key. Use [`ChatClient::new`] for the
//! default Groq endpoint or [`ChatClient::with_base_url`] to point at a mock
//! server in tests.

use std::time::Duration;

use base64::Engine as _;
use reqwest::{Client, Url};

use crate::error::OracleError;
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent,
};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_USER_AGENT: &str = "scout/0.1 (influencer-matching)";

pub struct ChatClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Creates a client pointed at the production Groq API.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, OracleError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_USER_AGENT, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OracleError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint =
            Url::parse(&normalised).map_err(|_| OracleError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Sends a single-turn text prompt and returns the reply text.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Http`] on network failure.
    /// - [`OracleError::Status`] on a non-2xx response.
    /// - [`OracleError::EmptyResponse`] if the reply carries no content.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(MessageContent::Text(prompt.to_owned()))],
            max_tokens: None,
        };
        self.send(&request).await
    }

    /// Sends `prompt` with a PNG attached as a base64 data URL.
    ///
    /// # Errors
    ///
    /// Same as [`ChatClient::complete`].
    pub async fn describe_image(
        &self,
        model: &str,
        prompt: &str,
        png: &[u8],
        max_tokens: u32,
    ) -> Result<String, OracleError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.to_owned(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{encoded}"),
                    },
                },
            ]))],
            max_tokens: Some(max_tokens),
        };
        self.send(&request).await
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<String, OracleError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::Deserialize {
                context: format!("chat completion ({})", request.model),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OracleError::EmptyResponse)
    }

    #[cfg(test)]
    pub(crate) fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
