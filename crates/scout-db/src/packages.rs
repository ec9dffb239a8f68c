//! Database operations for the `packages` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scout_core::PackageOffer;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `packages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PackageRow {
    pub id: i64,
    pub username: String,
    pub package_title: String,
    pub package_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PackageRow> for PackageOffer {
    fn from(row: PackageRow) -> Self {
        PackageOffer {
            title: row.package_title,
            price: row.package_price,
        }
    }
}

/// List every package offered by `username`, cheapest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_packages_for_username(
    pool: &PgPool,
    username: &str,
) -> Result<Vec<PackageRow>, DbError> {
    let rows = sqlx::query_as::<_, PackageRow>(
        "SELECT id, username, package_title, package_price, created_at, updated_at \
         FROM packages \
         WHERE username = $1 \
         ORDER BY package_price ASC, package_title ASC",
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
