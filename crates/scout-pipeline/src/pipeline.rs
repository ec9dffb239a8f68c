//! Five-stage narrowing of the influencer population down to finalists.

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use scout_core::{
    AdapterError, CampaignBrief, CandidateStore, EnrichedInfluencer, MediaEnrichment, RankOrder,
    RankingCandidate, RankingOracle,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::fan_out::fan_out;
use crate::retry::retry_with_backoff;
use crate::{PipelineError, PipelineOptions, RunSnapshot, Stage};

/// A run started with [`NarrowingPipeline::spawn`].
pub struct RunHandle {
    pub progress: watch::Receiver<RunSnapshot>,
    pub task: JoinHandle<Result<Vec<EnrichedInfluencer>, PipelineError>>,
}

pub struct NarrowingPipeline {
    store: Arc<dyn CandidateStore>,
    oracle: Arc<dyn RankingOracle>,
    media: Arc<dyn MediaEnrichment>,
    options: PipelineOptions,
}

impl NarrowingPipeline {
    #[must_use]
    pub fn new(
        store: Arc<dyn CandidateStore>,
        oracle: Arc<dyn RankingOracle>,
        media: Arc<dyn MediaEnrichment>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            oracle,
            media,
            options,
        }
    }

    /// Runs one brief on a background task.
    ///
    /// A panic inside an adapter still publishes a `Failed` snapshot before
    /// the panic is re-raised on the task.
    #[must_use]
    pub fn spawn(self: &Arc<Self>, brief: CampaignBrief) -> RunHandle {
        let (tx, rx) = watch::channel(RunSnapshot::default());
        let pipeline = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(pipeline.run(&brief, &tx))
                .catch_unwind()
                .await;
            match outcome {
                Ok(result) => result,
                Err(panic) => {
                    let stage = tx.borrow().stage;
                    tracing::error!(%stage, "narrowing run panicked");
                    tx.send_modify(|s| s.fail(format!("{stage} failed: internal error")));
                    std::panic::resume_unwind(panic)
                }
            }
        });
        RunHandle { progress: rx, task }
    }

    /// Narrows the population for `brief`, publishing a snapshot after every
    /// transition. Expects a brief that passed [`CampaignBrief::validate`].
    ///
    /// The last published snapshot is `Done` with the finalists on success
    /// and `Failed` with the error message otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if stage 1 cannot reach the store or a
    /// ranking stage exhausts its upstream retries.
    pub async fn run(
        &self,
        brief: &CampaignBrief,
        progress: &watch::Sender<RunSnapshot>,
    ) -> Result<Vec<EnrichedInfluencer>, PipelineError> {
        let result = self.run_stages(brief, progress).await;
        match &result {
            Ok(finalists) => {
                tracing::info!(finalists = finalists.len(), "narrowing run done");
                let finalists = finalists.clone();
                progress.send_modify(|s| s.finish(finalists));
            }
            Err(e) => {
                tracing::error!(stage = %e.stage, error = %e.source, "narrowing run failed");
                let message = e.to_string();
                progress.send_modify(|s| s.fail(message));
            }
        }
        result
    }

    async fn run_stages(
        &self,
        brief: &CampaignBrief,
        progress: &watch::Sender<RunSnapshot>,
    ) -> Result<Vec<EnrichedInfluencer>, PipelineError> {
        let enter = |stage: Stage| {
            tracing::info!(%stage, "stage started");
            progress.send_modify(|s| s.enter(stage));
        };
        let complete = |stage: Stage, survivors: usize| {
            tracing::info!(%stage, survivors, "stage complete");
            progress.send_modify(|s| s.complete(stage, survivors));
        };

        enter(Stage::Filtering);
        let qualified = self.filter(brief).await?;
        complete(Stage::Filtering, qualified.len());

        enter(Stage::DescRanking);
        let shortlist = self
            .rank(
                Stage::DescRanking,
                brief,
                qualified,
                self.options.shortlist_size,
            )
            .await?;
        complete(Stage::DescRanking, shortlist.len());

        enter(Stage::FeedAnalyzing);
        let analyzed = self.analyze_feeds(shortlist).await;
        complete(Stage::FeedAnalyzing, analyzed.len());

        enter(Stage::FeedRanking);
        let finalists = self
            .rank(
                Stage::FeedRanking,
                brief,
                analyzed,
                self.options.finalist_size,
            )
            .await?;
        complete(Stage::FeedRanking, finalists.len());

        enter(Stage::Enriching);
        let profiles = self.attach_avatars(finalists).await;
        complete(Stage::Enriching, profiles.len());

        Ok(profiles)
    }

    /// Stage 1: category and follower range in the store, then the budget
    /// rule per candidate. Any store failure aborts.
    async fn filter(&self, brief: &CampaignBrief) -> Result<Vec<EnrichedInfluencer>, PipelineError> {
        let fail = |e| PipelineError::new(Stage::Filtering, e);

        let candidates = self
            .store
            .fetch_candidates(
                brief.category,
                brief.follower_range.min,
                brief.follower_range.max,
            )
            .await
            .map_err(fail)?;
        tracing::debug!(candidates = candidates.len(), "store returned candidates");

        let budget = brief.budget;
        let store = &self.store;
        let priced = fan_out(candidates, self.options.fan_out_limit, |candidate| async move {
            store
                .fetch_qualifying_packages(&candidate.username, budget)
                .await
                .map(|packages| packages.map(|p| EnrichedInfluencer::new(candidate, p)))
        })
        .await;

        let mut qualified = Vec::with_capacity(priced.len());
        for result in priced {
            if let Some(influencer) = result.map_err(fail)? {
                qualified.push(influencer);
            }
        }
        Ok(qualified)
    }

    /// Stages 2 and 4. An empty pool never reaches the oracle.
    async fn rank(
        &self,
        stage: Stage,
        brief: &CampaignBrief,
        pool: Vec<EnrichedInfluencer>,
        n: usize,
    ) -> Result<Vec<EnrichedInfluencer>, PipelineError> {
        if pool.is_empty() {
            return Ok(pool);
        }

        let payload: Vec<RankingCandidate> = pool.iter().map(RankingCandidate::from).collect();
        let ranked = retry_with_backoff(
            self.options.oracle_max_retries,
            self.options.oracle_retry_backoff_ms,
            || self.oracle.rank_top_n(brief, &payload, n),
        )
        .await;

        let usernames = match ranked {
            Ok(usernames) => usernames,
            Err(AdapterError::RankingParse(reason)) => {
                tracing::warn!(%stage, %reason, "unparseable ranking, no candidates survive");
                Vec::new()
            }
            Err(e) => return Err(PipelineError::new(stage, e)),
        };

        Ok(select_ranked(pool, &usernames, n, self.options.rank_order))
    }

    /// Stage 3. Candidates whose feed cannot be described are dropped.
    async fn analyze_feeds(&self, shortlist: Vec<EnrichedInfluencer>) -> Vec<EnrichedInfluencer> {
        let media = &self.media;
        let described = fan_out(shortlist, self.options.fan_out_limit, |influencer| async move {
            let feed = media.describe_feed_image(influencer.username()).await;
            (influencer, feed)
        })
        .await;

        described
            .into_iter()
            .filter_map(|(influencer, feed)| match feed {
                Ok(feed) => Some(influencer.with_feed(feed)),
                Err(e) => {
                    tracing::warn!(
                        username = influencer.username(),
                        error = %e,
                        "feed analysis failed, dropping candidate"
                    );
                    None
                }
            })
            .collect()
    }

    /// Stage 5. Finalists without an avatar are dropped.
    async fn attach_avatars(&self, finalists: Vec<EnrichedInfluencer>) -> Vec<EnrichedInfluencer> {
        let media = &self.media;
        let fetched = fan_out(finalists, self.options.fan_out_limit, |influencer| async move {
            let avatar = media.fetch_avatar(influencer.username()).await;
            (influencer, avatar)
        })
        .await;

        fetched
            .into_iter()
            .filter_map(|(influencer, avatar)| match avatar {
                Ok(avatar) => Some(influencer.with_avatar(avatar)),
                Err(e) => {
                    tracing::warn!(
                        username = influencer.username(),
                        error = %e,
                        "avatar fetch failed, dropping finalist"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Keeps the members of `pool` the oracle named, at most `n` of them.
///
/// Unknown and repeated usernames are ignored. The survivors are the first
/// `n` distinct known names in the oracle's reply; `order` decides whether
/// they come back in reply order or in their order within `pool`.
pub(crate) fn select_ranked(
    pool: Vec<EnrichedInfluencer>,
    usernames: &[String],
    n: usize,
    order: RankOrder,
) -> Vec<EnrichedInfluencer> {
    let index: HashMap<&str, usize> = pool
        .iter()
        .enumerate()
        .map(|(i, influencer)| (influencer.username(), i))
        .collect();

    let mut seen = HashSet::new();
    let chosen: Vec<usize> = usernames
        .iter()
        .filter_map(|name| index.get(name.as_str()).copied())
        .filter(|i| seen.insert(*i))
        .take(n)
        .collect();

    let mut slots: Vec<Option<EnrichedInfluencer>> = pool.into_iter().map(Some).collect();
    match order {
        RankOrder::Oracle => chosen
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect(),
        RankOrder::Input => {
            let keep: HashSet<usize> = chosen.into_iter().collect();
            slots
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep.contains(i))
                .filter_map(|(_, slot)| slot)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scout_core::{CandidateInfluencer, Category, PackageOffer};

    use super::*;

    fn influencer(username: &str) -> EnrichedInfluencer {
        EnrichedInfluencer::new(
            CandidateInfluencer {
                username: username.to_string(),
                name: username.to_string(),
                category: Category::Beauty,
                follower_count: 10_000,
                title: String::new(),
                description: String::new(),
                rating_count: 0,
                average_rating: 0.0,
            },
            vec![PackageOffer {
                title: "Post".to_string(),
                price: Decimal::from(50),
            }],
        )
    }

    fn pool(names: &[&str]) -> Vec<EnrichedInfluencer> {
        names.iter().map(|n| influencer(n)).collect()
    }

    fn names(selected: &[EnrichedInfluencer]) -> Vec<&str> {
        selected.iter().map(EnrichedInfluencer::username).collect()
    }

    fn reply(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn oracle_order_follows_reply() {
        let selected = select_ranked(
            pool(&["a", "b", "c", "d"]),
            &reply(&["c", "a", "d"]),
            10,
            RankOrder::Oracle,
        );
        assert_eq!(names(&selected), vec!["c", "a", "d"]);
    }

    #[test]
    fn input_order_follows_pool() {
        let selected = select_ranked(
            pool(&["a", "b", "c", "d"]),
            &reply(&["c", "a", "d"]),
            10,
            RankOrder::Input,
        );
        assert_eq!(names(&selected), vec!["a", "c", "d"]);
    }

    #[test]
    fn unknown_and_duplicate_names_are_dropped() {
        let selected = select_ranked(
            pool(&["a", "b"]),
            &reply(&["ghost", "b", "b", "a", "phantom"]),
            10,
            RankOrder::Oracle,
        );
        assert_eq!(names(&selected), vec!["b", "a"]);
    }

    #[test]
    fn never_returns_more_than_n() {
        let selected = select_ranked(
            pool(&["a", "b", "c", "d", "e"]),
            &reply(&["e", "d", "c", "b", "a"]),
            3,
            RankOrder::Input,
        );
        assert_eq!(names(&selected), vec!["c", "d", "e"]);
    }

    #[test]
    fn empty_reply_selects_nothing() {
        assert!(select_ranked(pool(&["a"]), &[], 3, RankOrder::Oracle).is_empty());
    }
}
