//! Database operations for the `influencers` table.

use chrono::{DateTime, Utc};
use scout_core::{CandidateInfluencer, Category};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `influencers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfluencerRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Display name of a [`Category`], e.g. `"Food & Drink"`.
    pub category: String,
    pub follower_count: i64,
    pub title: String,
    pub description: String,
    pub rating_count: i32,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InfluencerRow> for CandidateInfluencer {
    type Error = DbError;

    fn try_from(row: InfluencerRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|reason| DbError::InvalidRow {
                table: "influencers",
                reason,
            })?;

        Ok(CandidateInfluencer {
            username: row.username,
            name: row.name,
            category,
            follower_count: row.follower_count,
            title: row.title,
            description: row.description,
            rating_count: row.rating_count,
            average_rating: row.average_rating,
        })
    }
}

/// List influencers in `category` whose follower count lies in the inclusive
/// range `[follower_min, follower_max]`.
///
/// Ordered by follower count descending; ties break on username so repeated
/// runs see the same order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_influencers_in_range(
    pool: &PgPool,
    category: Category,
    follower_min: i64,
    follower_max: i64,
) -> Result<Vec<InfluencerRow>, DbError> {
    let rows = sqlx::query_as::<_, InfluencerRow>(
        "SELECT id, username, name, category, follower_count, title, description, \
                rating_count, average_rating, created_at, updated_at \
         FROM influencers \
         WHERE category = $1 \
           AND follower_count >= $2 \
           AND follower_count <= $3 \
         ORDER BY follower_count DESC, username ASC",
    )
    .bind(category.as_str())
    .bind(follower_min)
    .bind(follower_max)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
