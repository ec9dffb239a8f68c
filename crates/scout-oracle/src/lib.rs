pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod ranker;
pub mod selector;
mod types;

pub use client::{ChatClient, DEFAULT_BASE_URL};
pub use error::OracleError;
pub use parse::{BracketListParser, RankingParser};
pub use prompt::{build_ranking_prompt, FEED_DESCRIPTION_PROMPT, MAX_PROMPT_CANDIDATES};
pub use ranker::OracleRanker;
pub use selector::{
    selector_for, ClientPool, ClientSelector, ParitySelector, RoundRobinSelector,
};
