use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

use scout_core::AdapterError;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Connection pool sizing, normally taken from [`scout_core::AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &scout_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },
}

impl From<DbError> for AdapterError {
    fn from(err: DbError) -> Self {
        AdapterError::StoreUnavailable(err.to_string())
    }
}

/// Opens the influencer database pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established within the
/// acquire timeout.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Applies pending migrations from the workspace `migrations/` directory and
/// returns how many were new.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    let before = applied_migration_count(pool).await;
    MIGRATOR.run(pool).await?;
    let after = applied_migration_count(pool).await;

    let fresh = usize::try_from(after.saturating_sub(before)).unwrap_or(0);
    if fresh > 0 {
        tracing::info!(applied = fresh, "database migrations applied");
    }
    Ok(fresh)
}

async fn applied_migration_count(pool: &PgPool) -> i64 {
    // The bookkeeping table does not exist before the first run.
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| {
            tracing::debug!(error = %e, "could not count applied migrations, assuming 0");
            0
        })
}

/// Round-trips `SELECT 1`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can run the query.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// [`ping`] with the error mapped into [`DbError`], for the server health route.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the ping fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await.map_err(DbError::from)
}

pub mod influencers;
pub mod packages;
pub mod seed;
pub mod store;

pub use influencers::{list_influencers_in_range, InfluencerRow};
pub use packages::{list_packages_for_username, PackageRow};
pub use seed::seed_population;
pub use store::PgCandidateStore;
