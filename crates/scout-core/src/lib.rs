pub mod app_config;
pub mod brief;
pub mod config;
pub mod error;
pub mod influencer;
pub mod population;
pub mod ports;

pub use app_config::{AppConfig, Environment, RankOrder, SelectorKind};
pub use brief::{load_brief, CampaignBrief, Category, FollowerRange, Platform};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{AdapterError, ConfigError, ValidationError};
pub use influencer::{
    qualify_packages, CandidateInfluencer, EnrichedInfluencer, FeedSummary, PackageOffer,
    RankingCandidate,
};
pub use population::{load_population, InfluencerSeed, PopulationFile};
pub use ports::{CandidateStore, MediaEnrichment, RankingOracle};

/// Storage collection holding feed screenshots and avatars.
pub const DEFAULT_ASSET_COLLECTION: &str = "influencers";

/// Asset key for an influencer's feed screenshot.
#[must_use]
pub fn feed_asset_key(username: &str) -> String {
    format!("{username}.png")
}

/// Asset key for an influencer's avatar image.
#[must_use]
pub fn avatar_asset_key(username: &str) -> String {
    format!("{username}_avatar.png")
}
