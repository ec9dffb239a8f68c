//! Influencer records as they move through the narrowing stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Category;

/// One row of the influencer population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfluencer {
    pub username: String,
    pub name: String,
    pub category: Category,
    pub follower_count: i64,
    pub title: String,
    pub description: String,
    pub rating_count: i32,
    pub average_rating: f64,
}

/// A purchasable package offered by one influencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOffer {
    pub title: String,
    pub price: Decimal,
}

/// AI-generated description of an influencer's feed plus the screenshot it
/// was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    pub description: String,
    pub image: Vec<u8>,
}

/// A candidate that survived the budget filter, with data attached stage by
/// stage: packages at filtering, feed at feed analysis, avatar at enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedInfluencer {
    pub candidate: CandidateInfluencer,
    /// Ascending by price; never empty.
    pub packages: Vec<PackageOffer>,
    pub feed: Option<FeedSummary>,
    pub avatar: Option<Vec<u8>>,
}

impl EnrichedInfluencer {
    #[must_use]
    pub fn new(candidate: CandidateInfluencer, packages: Vec<PackageOffer>) -> Self {
        Self {
            candidate,
            packages,
            feed: None,
            avatar: None,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.candidate.username
    }

    /// The qualifying (lowest) package price.
    #[must_use]
    pub fn cheapest_price(&self) -> Option<Decimal> {
        self.packages.first().map(|p| p.price)
    }

    #[must_use]
    pub fn with_feed(mut self, feed: FeedSummary) -> Self {
        self.feed = Some(feed);
        self
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: Vec<u8>) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// Candidate view sent to the ranking oracle. Carries the feed description
/// but never the feed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingCandidate {
    #[serde(flatten)]
    pub candidate: CandidateInfluencer,
    pub packages: Vec<PackageOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_description: Option<String>,
}

impl From<&EnrichedInfluencer> for RankingCandidate {
    fn from(influencer: &EnrichedInfluencer) -> Self {
        Self {
            candidate: influencer.candidate.clone(),
            packages: influencer.packages.clone(),
            feed_description: influencer.feed.as_ref().map(|f| f.description.clone()),
        }
    }
}

/// Apply the budget rule to an influencer's packages.
///
/// Sorts ascending by price and returns `None` when there are no packages or
/// the cheapest one costs more than `budget`. A price equal to the budget
/// qualifies.
#[must_use]
pub fn qualify_packages(
    mut packages: Vec<PackageOffer>,
    budget: Decimal,
) -> Option<Vec<PackageOffer>> {
    packages.sort_by(|a, b| a.price.cmp(&b.price));
    match packages.first() {
        Some(cheapest) if cheapest.price <= budget => Some(packages),
        _ => None,
    }
}
