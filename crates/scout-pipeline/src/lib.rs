//! Candidate-narrowing pipeline.
//!
//! Stages run strictly in sequence:
//!
//! 1. **Filtering**: category, follower range and budget via the store.
//! 2. **Description ranking**: oracle picks the shortlist from profile data.
//! 3. **Feed analysis**: one vision description per shortlisted feed.
//! 4. **Feed ranking**: oracle picks the finalists using the descriptions.
//! 5. **Enrichment**: avatars for the finalists.
//!
//! Fan-out stages wait for every call before advancing, and each call's
//! result keeps its input position. Progress is published on a
//! [`tokio::sync::watch`] channel of [`RunSnapshot`]s.

pub mod error;
pub mod fan_out;
pub mod options;
pub mod pipeline;
mod retry;
pub mod snapshot;
pub mod stage;

pub use error::PipelineError;
pub use fan_out::fan_out;
pub use options::{PipelineOptions, DEFAULT_FINALIST_SIZE, DEFAULT_SHORTLIST_SIZE};
pub use pipeline::{NarrowingPipeline, RunHandle};
pub use snapshot::{RunSnapshot, StageOutcome, StatusRow};
pub use stage::Stage;
