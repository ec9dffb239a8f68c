use scout_core::InfluencerSeed;
use sqlx::PgPool;

use crate::DbError;

/// Upsert an influencer population, including every package.
///
/// Returns the number of influencers processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back. An influencer's stored packages end up
/// exactly matching the seed: packages missing from it are deleted.
/// Re-seeding the same file is a no-op apart from `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_population(pool: &PgPool, influencers: &[InfluencerSeed]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for influencer in influencers {
        sqlx::query(
            "INSERT INTO influencers (username, name, category, follower_count, title, description, rating_count, average_rating) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (username) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 category = EXCLUDED.category, \
                 follower_count = EXCLUDED.follower_count, \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 rating_count = EXCLUDED.rating_count, \
                 average_rating = EXCLUDED.average_rating, \
                 updated_at = NOW()",
        )
        .bind(&influencer.username)
        .bind(&influencer.name)
        .bind(influencer.category.as_str())
        .bind(influencer.follower_count)
        .bind(&influencer.title)
        .bind(&influencer.description)
        .bind(influencer.rating_count)
        .bind(influencer.average_rating)
        .execute(&mut *tx)
        .await?;

        let titles: Vec<&str> = influencer.packages.iter().map(|p| p.title.as_str()).collect();
        sqlx::query("DELETE FROM packages WHERE username = $1 AND package_title <> ALL($2)")
            .bind(&influencer.username)
            .bind(&titles)
            .execute(&mut *tx)
            .await?;

        for package in &influencer.packages {
            sqlx::query(
                "INSERT INTO packages (username, package_title, package_price) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (username, package_title) DO UPDATE SET \
                     package_price = EXCLUDED.package_price, \
                     updated_at = NOW()",
            )
            .bind(&influencer.username)
            .bind(&package.title)
            .bind(package.price)
            .execute(&mut *tx)
            .await?;
        }

        count += 1;
    }

    tx.commit().await?;
    tracing::debug!(count, "seeded influencer population");
    Ok(count)
}
