mod search;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use scout_pipeline::{NarrowingPipeline, PipelineOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scout-cli")]
#[command(about = "Influencer scout command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a campaign brief through the narrowing stages and print the finalists
    Search {
        /// Path to the brief YAML file
        #[arg(long, default_value = "config/brief.yaml")]
        brief: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert the influencer population from a YAML file
    Seed {
        /// Path to the population YAML file
        #[arg(long, default_value = "config/population.yaml")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("scout-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = scout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = scout_db::PoolConfig::from_app_config(&config);
    let pool = scout_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => run_db(&pool, command).await?,
        Commands::Search { brief } => {
            let brief = scout_core::load_brief(&brief)?;
            let clients = Arc::new(scout_oracle::ClientPool::from_app_config(&config)?);
            let pipeline = NarrowingPipeline::new(
                Arc::new(scout_db::PgCandidateStore::new(pool.clone())),
                Arc::new(scout_oracle::OracleRanker::from_app_config(
                    Arc::clone(&clients),
                    &config,
                )),
                Arc::new(scout_media::MediaAdapter::from_app_config(&config, clients)?),
                PipelineOptions::from_app_config(&config),
            );
            search::run_search(&Arc::new(pipeline), brief).await?;
        }
    }

    Ok(())
}

async fn run_db(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            scout_db::ping(pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = scout_db::run_migrations(pool).await?;
            println!("applied {applied} new migration(s)");
        }
        DbCommands::Seed { file } => {
            let population = scout_core::load_population(&file)?;
            scout_db::run_migrations(pool).await?;
            let seeded = scout_db::seed_population(pool, &population.influencers).await?;
            tracing::info!(path = %file.display(), seeded, "population seeded");
            println!("seeded {seeded} influencers from {}", file.display());
        }
    }
    Ok(())
}
