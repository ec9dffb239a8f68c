use crate::app_config::{AppConfig, Environment, RankOrder, SelectorKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let storage_url = require("SCOUT_STORAGE_URL")?;
    let storage_key = require("SCOUT_STORAGE_KEY")?;

    let oracle_api_keys: Vec<String> = require("SCOUT_ORACLE_API_KEYS")?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if oracle_api_keys.is_empty() {
        return Err(invalid(
            "SCOUT_ORACLE_API_KEYS",
            "at least one API key is required".to_string(),
        ));
    }

    let env = parse_environment(&or_default("SCOUT_ENV", "development"))?;

    let bind_addr = or_default("SCOUT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SCOUT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SCOUT_LOG_LEVEL", "info");
    let user_agent = or_default("SCOUT_USER_AGENT", "scout/0.1 (influencer-matching)");

    let db_max_connections = parse_u32("SCOUT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SCOUT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SCOUT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let oracle_base_url = or_default("SCOUT_ORACLE_BASE_URL", "https://api.groq.com/openai/v1");
    let oracle_text_model = or_default("SCOUT_ORACLE_TEXT_MODEL", "deepseek-r1-distill-llama-70b");
    let oracle_vision_model =
        or_default("SCOUT_ORACLE_VISION_MODEL", "llama-3.2-11b-vision-preview");
    let oracle_selector = parse_selector(&or_default("SCOUT_ORACLE_SELECTOR", "parity"))?;
    let oracle_timeout_secs = parse_u64("SCOUT_ORACLE_TIMEOUT_SECS", "60")?;
    let oracle_max_retries = parse_u32("SCOUT_ORACLE_MAX_RETRIES", "0")?;
    let oracle_retry_backoff_ms = parse_u64("SCOUT_ORACLE_RETRY_BACKOFF_MS", "1000")?;

    let storage_bucket = or_default("SCOUT_STORAGE_BUCKET", crate::DEFAULT_ASSET_COLLECTION);
    let storage_timeout_secs = parse_u64("SCOUT_STORAGE_TIMEOUT_SECS", "30")?;

    let fan_out_limit = match parse_u64("SCOUT_FAN_OUT_LIMIT", "0")? {
        0 => None,
        n => Some(
            usize::try_from(n).map_err(|e| invalid("SCOUT_FAN_OUT_LIMIT", e.to_string()))?,
        ),
    };
    let rank_order = parse_rank_order(&or_default("SCOUT_RANK_ORDER", "oracle"))?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        user_agent,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        oracle_base_url,
        oracle_api_keys,
        oracle_text_model,
        oracle_vision_model,
        oracle_selector,
        oracle_timeout_secs,
        oracle_max_retries,
        oracle_retry_backoff_ms,
        storage_url,
        storage_key,
        storage_bucket,
        storage_timeout_secs,
        fan_out_limit,
        rank_order,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_selector(s: &str) -> Result<SelectorKind, ConfigError> {
    match s {
        "parity" => Ok(SelectorKind::Parity),
        "round_robin" => Ok(SelectorKind::RoundRobin),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_ORACLE_SELECTOR".to_string(),
            reason: format!("expected 'parity' or 'round_robin', got '{other}'"),
        }),
    }
}

fn parse_rank_order(s: &str) -> Result<RankOrder, ConfigError> {
    match s {
        "oracle" => Ok(RankOrder::Oracle),
        "input" => Ok(RankOrder::Input),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_RANK_ORDER".to_string(),
            reason: format!("expected 'oracle' or 'input', got '{other}'"),
        }),
    }
}
