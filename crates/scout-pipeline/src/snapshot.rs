//! Observable progress of a narrowing run.

use scout_core::EnrichedInfluencer;
use serde::Serialize;

use crate::Stage;

/// A working stage that has finished, with how many candidates survived it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub survivors: usize,
}

/// One line of the user-facing progress list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub stage: Stage,
    pub text: &'static str,
    pub complete: bool,
}

/// Point-in-time view of a run, published after every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSnapshot {
    pub stage: Stage,
    pub completed: Vec<StageOutcome>,
    /// Populated once the run is `Done`.
    pub finalists: Vec<EnrichedInfluencer>,
    /// Populated once the run is `Failed`.
    pub error: Option<String>,
}

impl RunSnapshot {
    pub(crate) fn enter(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn complete(&mut self, stage: Stage, survivors: usize) {
        self.completed.push(StageOutcome { stage, survivors });
    }

    pub(crate) fn finish(&mut self, finalists: Vec<EnrichedInfluencer>) {
        self.stage = Stage::Done;
        self.finalists = finalists;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.stage = Stage::Failed;
        self.error = Some(message);
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Survivor count of `stage`, if it has completed.
    #[must_use]
    pub fn survivors(&self, stage: Stage) -> Option<usize> {
        self.completed
            .iter()
            .find(|o| o.stage == stage)
            .map(|o| o.survivors)
    }

    /// Completed stages with their complete text, followed by the running
    /// stage's pending text.
    #[must_use]
    pub fn status_rows(&self) -> Vec<StatusRow> {
        let mut rows: Vec<StatusRow> = self
            .completed
            .iter()
            .filter_map(|o| {
                o.stage.complete_text().map(|text| StatusRow {
                    stage: o.stage,
                    text,
                    complete: true,
                })
            })
            .collect();

        let running = self.survivors(self.stage).is_none();
        if let (true, Some(text)) = (running, self.stage.pending_text()) {
            rows.push(StatusRow {
                stage: self.stage,
                text,
                complete: false,
            });
        }
        rows
    }
}
