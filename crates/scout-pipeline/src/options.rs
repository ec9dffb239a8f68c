use scout_core::{AppConfig, RankOrder};

pub const DEFAULT_SHORTLIST_SIZE: usize = 10;
pub const DEFAULT_FINALIST_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Survivors of the description ranking.
    pub shortlist_size: usize,
    /// Survivors of the feed ranking.
    pub finalist_size: usize,
    /// Concurrent calls per fan-out stage; `None` is unbounded.
    pub fan_out_limit: Option<usize>,
    pub rank_order: RankOrder,
    /// Extra attempts after an upstream ranking failure.
    pub oracle_max_retries: u32,
    pub oracle_retry_backoff_ms: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            finalist_size: DEFAULT_FINALIST_SIZE,
            fan_out_limit: None,
            rank_order: RankOrder::Oracle,
            oracle_max_retries: 0,
            oracle_retry_backoff_ms: 1_000,
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            fan_out_limit: config.fan_out_limit,
            rank_order: config.rank_order,
            oracle_max_retries: config.oracle_max_retries,
            oracle_retry_backoff_ms: config.oracle_retry_backoff_ms,
            ..Self::default()
        }
    }
}
