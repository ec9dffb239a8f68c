use std::sync::Arc;

use async_trait::async_trait;
use scout_core::{
    avatar_asset_key, feed_asset_key, AdapterError, AppConfig, FeedSummary, MediaEnrichment,
};
use scout_oracle::{ClientPool, FEED_DESCRIPTION_PROMPT};

use crate::storage::StorageClient;

/// Upper bound on the generated feed description.
pub const FEED_DESCRIPTION_MAX_TOKENS: u32 = 500;

/// [`MediaEnrichment`] over object storage plus a vision model.
pub struct MediaAdapter {
    storage: StorageClient,
    vision: Arc<ClientPool>,
    vision_model: String,
    collection: String,
}

impl MediaAdapter {
    #[must_use]
    pub fn new(
        storage: StorageClient,
        vision: Arc<ClientPool>,
        vision_model: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            vision,
            vision_model: vision_model.into(),
            collection: collection.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::StorageError`] if the storage client cannot be built.
    pub fn from_app_config(
        config: &AppConfig,
        vision: Arc<ClientPool>,
    ) -> Result<Self, crate::StorageError> {
        let storage = StorageClient::new(
            &config.storage_url,
            &config.storage_key,
            config.storage_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self::new(
            storage,
            vision,
            config.oracle_vision_model.clone(),
            config.storage_bucket.clone(),
        ))
    }
}

#[async_trait]
impl MediaEnrichment for MediaAdapter {
    async fn fetch_binary_asset(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Vec<u8>, AdapterError> {
        let bytes = self.storage.download(collection, key).await?;
        tracing::debug!(collection, key, bytes = bytes.len(), "fetched asset");
        Ok(bytes)
    }

    async fn describe_feed_image(&self, username: &str) -> Result<FeedSummary, AdapterError> {
        let image = self
            .fetch_binary_asset(&self.collection, &feed_asset_key(username))
            .await?;

        let description = self
            .vision
            .primary()
            .describe_image(
                &self.vision_model,
                FEED_DESCRIPTION_PROMPT,
                &image,
                FEED_DESCRIPTION_MAX_TOKENS,
            )
            .await?;

        Ok(FeedSummary { description, image })
    }

    async fn fetch_avatar(&self, username: &str) -> Result<Vec<u8>, AdapterError> {
        self.fetch_binary_asset(&self.collection, &avatar_asset_key(username))
            .await
    }
}
