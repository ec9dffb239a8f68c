use thiserror::Error;

/// Failures surfaced by the store, oracle and media adapters.
///
/// Adapters never retry; the variant tells the caller which policy applies.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The backing database or object store could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A binary asset does not exist under the requested key.
    #[error("asset not found: {collection}/{key}")]
    AssetNotFound { collection: String, key: String },

    /// The oracle replied, but no username list could be extracted.
    #[error("could not parse ranking response: {0}")]
    RankingParse(String),

    /// Transport or provider failure talking to the oracle.
    #[error("ranking upstream error: {0}")]
    RankingUpstream(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid population file: {0}")]
    Population(String),
}

/// A brief that violates the intake constraints.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("budget must be at least ${min}")]
    BudgetTooLow { min: i64 },

    #[error("follower bounds must be within [{floor}, {ceiling}]")]
    FollowerBoundsOutOfRange { floor: i64, ceiling: i64 },

    #[error("minimum followers must be less than or equal to maximum followers")]
    FollowerRangeInverted,
}
