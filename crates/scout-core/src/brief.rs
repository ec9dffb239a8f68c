use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ValidationError};

/// Smallest campaign budget accepted at intake, in whole dollars.
pub const MIN_BUDGET: i64 = 50;
/// Lowest follower bound a brief may request.
pub const FOLLOWER_FLOOR: i64 = 5_000;
/// Highest follower bound a brief may request.
pub const FOLLOWER_CEILING: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Beauty,
    Fashion,
    Travel,
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    #[serde(rename = "Health & Fitness")]
    HealthAndFitness,
    #[serde(rename = "Comedy & Entertainment")]
    ComedyAndEntertainment,
    #[serde(rename = "Animals & Pets")]
    AnimalsAndPets,
    Education,
    #[serde(rename = "Entrepreneur & Business")]
    EntrepreneurAndBusiness,
    Technology,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Beauty,
        Category::Fashion,
        Category::Travel,
        Category::FoodAndDrink,
        Category::HealthAndFitness,
        Category::ComedyAndEntertainment,
        Category::AnimalsAndPets,
        Category::Education,
        Category::EntrepreneurAndBusiness,
        Category::Technology,
    ];

    /// The stored/displayed name, e.g. `"Food & Drink"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Beauty => "Beauty",
            Category::Fashion => "Fashion",
            Category::Travel => "Travel",
            Category::FoodAndDrink => "Food & Drink",
            Category::HealthAndFitness => "Health & Fitness",
            Category::ComedyAndEntertainment => "Comedy & Entertainment",
            Category::AnimalsAndPets => "Animals & Pets",
            Category::Education => "Education",
            Category::EntrepreneurAndBusiness => "Entrepreneur & Business",
            Category::Technology => "Technology",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Instagram => write!(f, "Instagram"),
            Platform::TikTok => write!(f, "TikTok"),
            Platform::YouTube => write!(f, "YouTube"),
        }
    }
}

/// Inclusive follower-count bounds, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct FollowerRange {
    pub min: i64,
    pub max: i64,
}

impl FollowerRange {
    #[must_use]
    pub fn contains(&self, follower_count: i64) -> bool {
        (self.min..=self.max).contains(&follower_count)
    }
}

impl From<[i64; 2]> for FollowerRange {
    fn from([min, max]: [i64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<FollowerRange> for [i64; 2] {
    fn from(range: FollowerRange) -> Self {
        [range.min, range.max]
    }
}

/// A campaign brief as submitted at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub company_name: String,
    pub category: Category,
    pub company_description: String,
    pub campaign_description: String,
    pub budget: Decimal,
    pub follower_range: FollowerRange,
    pub platform: Platform,
    pub ideal_influencer: String,
}

impl CampaignBrief {
    /// Check the intake constraints. The pipeline assumes a brief that passed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("company_name", &self.company_name),
            ("company_description", &self.company_description),
            ("campaign_description", &self.campaign_description),
            ("ideal_influencer", &self.ideal_influencer),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        if self.budget < Decimal::from(MIN_BUDGET) {
            return Err(ValidationError::BudgetTooLow { min: MIN_BUDGET });
        }

        let FollowerRange { min, max } = self.follower_range;
        let in_bounds = |v: i64| (FOLLOWER_FLOOR..=FOLLOWER_CEILING).contains(&v);
        if !in_bounds(min) || !in_bounds(max) {
            return Err(ValidationError::FollowerBoundsOutOfRange {
                floor: FOLLOWER_FLOOR,
                ceiling: FOLLOWER_CEILING,
            });
        }
        if min > max {
            return Err(ValidationError::FollowerRangeInverted);
        }

        Ok(())
    }
}

/// Load a brief from a YAML file and validate it.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brief(path: &Path) -> Result<CampaignBrief, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brief: CampaignBrief = serde_yaml::from_str(&content)?;
    brief.validate()?;

    Ok(brief)
}

#[cfg(test)]
#[path = "brief_test.rs"]
mod tests;
