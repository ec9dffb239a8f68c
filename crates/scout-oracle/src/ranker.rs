use std::sync::Arc;

use async_trait::async_trait;
use scout_core::{AdapterError, AppConfig, CampaignBrief, RankingCandidate, RankingOracle};

use crate::parse::{BracketListParser, RankingParser};
use crate::prompt::build_ranking_prompt;
use crate::selector::ClientPool;

/// [`RankingOracle`] backed by a chat-completions model.
///
/// Makes exactly one provider call per ranking; retries are the caller's
/// concern.
pub struct OracleRanker {
    pool: Arc<ClientPool>,
    model: String,
    parser: Arc<dyn RankingParser>,
}

impl OracleRanker {
    #[must_use]
    pub fn new(pool: Arc<ClientPool>, model: impl Into<String>) -> Self {
        Self {
            pool,
            model: model.into(),
            parser: Arc::new(BracketListParser),
        }
    }

    #[must_use]
    pub fn from_app_config(pool: Arc<ClientPool>, config: &AppConfig) -> Self {
        Self::new(pool, config.oracle_text_model.clone())
    }

    /// Replaces the reply parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn RankingParser>) -> Self {
        self.parser = parser;
        self
    }
}

#[async_trait]
impl RankingOracle for OracleRanker {
    async fn rank_top_n(
        &self,
        brief: &CampaignBrief,
        candidates: &[RankingCandidate],
        n: usize,
    ) -> Result<Vec<String>, AdapterError> {
        let prompt = build_ranking_prompt(brief, candidates, n)?;
        let client = self.pool.client_for(n);

        tracing::debug!(
            model = %self.model,
            candidates = candidates.len(),
            n,
            "requesting ranking"
        );
        let reply = client.complete(&self.model, &prompt).await?;

        let usernames = self.parser.parse(&reply).inspect_err(|e| {
            tracing::warn!(error = %e, "oracle reply did not contain a username list");
        })?;
        tracing::debug!(returned = usernames.len(), n, "ranking parsed");
        Ok(usernames)
    }
}
