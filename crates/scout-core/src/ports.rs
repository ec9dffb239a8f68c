//! Adapter seams the narrowing pipeline is built against.
//!
//! Production implementations live in `scout-db`, `scout-oracle` and
//! `scout-media`; tests substitute in-memory fakes.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    AdapterError, CampaignBrief, CandidateInfluencer, Category, FeedSummary, PackageOffer,
    RankingCandidate,
};

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// All influencers in `category` with `follower_min <= followers <= follower_max`,
    /// ordered by follower count descending.
    async fn fetch_candidates(
        &self,
        category: Category,
        follower_min: i64,
        follower_max: i64,
    ) -> Result<Vec<CandidateInfluencer>, AdapterError>;

    /// Packages for `username` ascending by price, or `None` when there are
    /// none or the cheapest exceeds `budget`.
    async fn fetch_qualifying_packages(
        &self,
        username: &str,
        budget: Decimal,
    ) -> Result<Option<Vec<PackageOffer>>, AdapterError>;
}

#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Ask the oracle for the `n` best-fitting usernames, best first.
    ///
    /// The returned names are untrusted: they may be fewer than `n`, repeat,
    /// or not appear in `candidates` at all.
    async fn rank_top_n(
        &self,
        brief: &CampaignBrief,
        candidates: &[RankingCandidate],
        n: usize,
    ) -> Result<Vec<String>, AdapterError>;
}

#[async_trait]
pub trait MediaEnrichment: Send + Sync {
    async fn fetch_binary_asset(&self, collection: &str, key: &str)
        -> Result<Vec<u8>, AdapterError>;

    async fn describe_feed_image(&self, username: &str) -> Result<FeedSummary, AdapterError>;

    async fn fetch_avatar(&self, username: &str) -> Result<Vec<u8>, AdapterError>;
}
