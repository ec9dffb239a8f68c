//! Postgres-backed [`CandidateStore`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use scout_core::{
    qualify_packages, AdapterError, CandidateInfluencer, CandidateStore, Category, PackageOffer,
};
use sqlx::PgPool;

use crate::{list_influencers_in_range, list_packages_for_username, DbError};

#[derive(Debug, Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn fetch_candidates(
        &self,
        category: Category,
        follower_min: i64,
        follower_max: i64,
    ) -> Result<Vec<CandidateInfluencer>, AdapterError> {
        let rows =
            list_influencers_in_range(&self.pool, category, follower_min, follower_max).await?;
        let candidates = rows
            .into_iter()
            .map(CandidateInfluencer::try_from)
            .collect::<Result<Vec<_>, DbError>>()?;

        tracing::debug!(
            %category,
            follower_min,
            follower_max,
            count = candidates.len(),
            "fetched candidates"
        );
        Ok(candidates)
    }

    async fn fetch_qualifying_packages(
        &self,
        username: &str,
        budget: Decimal,
    ) -> Result<Option<Vec<PackageOffer>>, AdapterError> {
        let rows = list_packages_for_username(&self.pool, username).await?;
        let offers = rows.into_iter().map(PackageOffer::from).collect();
        Ok(qualify_packages(offers, budget))
    }
}
