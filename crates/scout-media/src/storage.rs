//! Client for a Supabase-compatible object storage API.
//!
//! Objects are read with `GET {base}/object/{collection}/{key}` and a
//! service-role bearer key.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use scout_core::AdapterError;
use thiserror::Error;

/// Path-segment encoding that leaves file-name punctuation readable.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("object not found: {collection}/{key}")]
    NotFound { collection: String, key: String },

    #[error("storage returned status {status} for {collection}/{key}")]
    Status {
        status: u16,
        collection: String,
        key: String,
    },
}

impl From<StorageError> for AdapterError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { collection, key } => {
                AdapterError::AssetNotFound { collection, key }
            }
            other => AdapterError::StoreUnavailable(other.to_string()),
        }
    }
}

pub struct StorageClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl StorageClient {
    /// # Errors
    ///
    /// Returns [`StorageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key: service_key.to_owned(),
        })
    }

    pub(crate) fn object_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            utf8_percent_encode(collection, SEGMENT),
            utf8_percent_encode(key, SEGMENT),
        )
    }

    /// Downloads an object's raw bytes.
    ///
    /// Storage reports a missing object as either 400 or 404; both map to
    /// [`StorageError::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] when the object does not exist.
    /// - [`StorageError::Status`] for any other non-2xx status.
    /// - [`StorageError::Http`] on network failure.
    pub async fn download(&self, collection: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(self.object_url(collection, key))
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Err(StorageError::NotFound {
                collection: collection.to_owned(),
                key: key.to_owned(),
            }),
            status if !status.is_success() => Err(StorageError::Status {
                status: status.as_u16(),
                collection: collection.to_owned(),
                key: key.to_owned(),
            }),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }
}
