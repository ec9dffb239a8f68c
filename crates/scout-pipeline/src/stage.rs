use serde::Serialize;

/// Lifecycle of one narrowing run.
///
/// Runs move strictly forward through the working stages and end in either
/// `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    Filtering,
    DescRanking,
    FeedAnalyzing,
    FeedRanking,
    Enriching,
    Done,
    Failed,
}

impl Stage {
    /// The five working stages in execution order.
    pub const WORKING: [Stage; 5] = [
        Stage::Filtering,
        Stage::DescRanking,
        Stage::FeedAnalyzing,
        Stage::FeedRanking,
        Stage::Enriching,
    ];

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Filtering => "filtering",
            Stage::DescRanking => "desc_ranking",
            Stage::FeedAnalyzing => "feed_analyzing",
            Stage::FeedRanking => "feed_ranking",
            Stage::Enriching => "enriching",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    /// Status line shown while the stage is running.
    #[must_use]
    pub fn pending_text(self) -> Option<&'static str> {
        match self {
            Stage::Filtering => {
                Some("Filtering influencers based on category, follower count, and price...")
            }
            Stage::DescRanking => Some("Filtering based on description and reviews..."),
            Stage::FeedAnalyzing => Some("Analyzing posts (may take a bit longer)..."),
            Stage::FeedRanking => Some("Filtering based on posts..."),
            Stage::Enriching => Some("Creating profiles..."),
            Stage::Idle | Stage::Done | Stage::Failed => None,
        }
    }

    /// Status line shown once the stage has finished.
    #[must_use]
    pub fn complete_text(self) -> Option<&'static str> {
        match self {
            Stage::Filtering => {
                Some("Filtered influencers based on category, follower count, and price.")
            }
            Stage::DescRanking => Some("Filtered based on description and reviews."),
            Stage::FeedAnalyzing => Some("Analyzed posts."),
            Stage::FeedRanking => Some("Filtered based on posts."),
            Stage::Enriching => Some("Created profiles."),
            Stage::Idle | Stage::Done | Stage::Failed => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
