mod api;
mod middleware;
mod sessions;

use std::sync::Arc;

use scout_pipeline::{NarrowingPipeline, PipelineOptions};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::sessions::SessionRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = scout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let pool_config = scout_db::PoolConfig::from_app_config(&config);
    let pool = scout_db::connect_pool(&config.database_url, pool_config).await?;
    scout_db::run_migrations(&pool).await?;

    let clients = Arc::new(scout_oracle::ClientPool::from_app_config(&config)?);
    let store = scout_db::PgCandidateStore::new(pool.clone());
    let oracle = scout_oracle::OracleRanker::from_app_config(Arc::clone(&clients), &config);
    let media = scout_media::MediaAdapter::from_app_config(&config, clients)?;
    let pipeline = NarrowingPipeline::new(
        Arc::new(store),
        Arc::new(oracle),
        Arc::new(media),
        PipelineOptions::from_app_config(&config),
    );

    let app = build_app(
        AppState {
            pool,
            pipeline: Arc::new(pipeline),
            sessions: SessionRegistry::default(),
        },
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "scout-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
