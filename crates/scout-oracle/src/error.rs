use scout_core::AdapterError;
use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx reply with no usable message content.
    #[error("provider returned no choices")]
    EmptyResponse,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("client pool requires at least one API key")]
    EmptyPool,
}

impl From<OracleError> for AdapterError {
    fn from(err: OracleError) -> Self {
        AdapterError::RankingUpstream(err.to_string())
    }
}
