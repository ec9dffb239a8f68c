use scout_core::AdapterError;
use thiserror::Error;

use crate::Stage;

/// A failure that aborted a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: AdapterError,
}

impl PipelineError {
    pub(crate) fn new(stage: Stage, source: AdapterError) -> Self {
        Self { stage, source }
    }
}
