use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How oracle requests are spread across the credential pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Even `n` goes to the first client, odd `n` to the second.
    Parity,
    RoundRobin,
}

/// Ordering of a ranking stage's survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// The order the oracle returned, restricted to known usernames.
    #[default]
    Oracle,
    /// The order the candidates had before the ranking call.
    Input,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub oracle_base_url: String,
    pub oracle_api_keys: Vec<String>,
    pub oracle_text_model: String,
    pub oracle_vision_model: String,
    pub oracle_selector: SelectorKind,
    pub oracle_timeout_secs: u64,
    pub oracle_max_retries: u32,
    pub oracle_retry_backoff_ms: u64,
    pub storage_url: String,
    pub storage_key: String,
    pub storage_bucket: String,
    pub storage_timeout_secs: u64,
    /// `None` means unbounded fan-out.
    pub fan_out_limit: Option<usize>,
    pub rank_order: RankOrder,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("oracle_base_url", &self.oracle_base_url)
            .field(
                "oracle_api_keys",
                &format!("[{} redacted]", self.oracle_api_keys.len()),
            )
            .field("oracle_text_model", &self.oracle_text_model)
            .field("oracle_vision_model", &self.oracle_vision_model)
            .field("oracle_selector", &self.oracle_selector)
            .field("oracle_timeout_secs", &self.oracle_timeout_secs)
            .field("oracle_max_retries", &self.oracle_max_retries)
            .field("oracle_retry_backoff_ms", &self.oracle_retry_backoff_ms)
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"[redacted]")
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_timeout_secs", &self.storage_timeout_secs)
            .field("fan_out_limit", &self.fan_out_limit)
            .field("rank_order", &self.rank_order)
            .finish()
    }
}
