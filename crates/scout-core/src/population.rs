use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{CandidateInfluencer, Category, ConfigError, PackageOffer};

/// One influencer entry in a population fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct InfluencerSeed {
    pub username: String,
    pub name: String,
    pub category: Category,
    pub follower_count: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating_count: i32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub packages: Vec<PackageOffer>,
}

impl InfluencerSeed {
    #[must_use]
    pub fn to_candidate(&self) -> CandidateInfluencer {
        CandidateInfluencer {
            username: self.username.clone(),
            name: self.name.clone(),
            category: self.category,
            follower_count: self.follower_count,
            title: self.title.clone(),
            description: self.description.clone(),
            rating_count: self.rating_count,
            average_rating: self.average_rating,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PopulationFile {
    pub influencers: Vec<InfluencerSeed>,
}

/// Load and validate an influencer population fixture from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_population(path: &Path) -> Result<PopulationFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let population = parse_population(&content)?;
    Ok(population)
}

fn parse_population(content: &str) -> Result<PopulationFile, ConfigError> {
    let population: PopulationFile = serde_yaml::from_str(content)?;
    validate_population(&population)?;
    Ok(population)
}

fn validate_population(population: &PopulationFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for influencer in &population.influencers {
        if influencer.username.trim().is_empty() {
            return Err(ConfigError::Population(
                "username must be non-empty".to_string(),
            ));
        }

        if !seen.insert(influencer.username.as_str()) {
            return Err(ConfigError::Population(format!(
                "duplicate username '{}'",
                influencer.username
            )));
        }

        if influencer.follower_count < 0 {
            return Err(ConfigError::Population(format!(
                "'{}' has a negative follower count",
                influencer.username
            )));
        }

        if let Some(pkg) = influencer.packages.iter().find(|p| p.price < Decimal::ZERO) {
            return Err(ConfigError::Population(format!(
                "package '{}' of '{}' has a negative price",
                pkg.title, influencer.username
            )));
        }
    }

    Ok(())
}
