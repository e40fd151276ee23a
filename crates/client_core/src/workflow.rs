//! Upload → predict → recommend state machine.
//!
//! [`Workflow`] is synchronous and owns no I/O. Network calls happen in
//! [`crate::Orchestrator`], which feeds their results back through the
//! `complete_*` methods together with the [`CycleId`] they were issued for.

use serde::Serialize;
use shared::domain::{EmotionLabel, RecommendationSet};
use tracing::debug;

use crate::{
    error::{WorkflowError, WorkflowResult},
    types::{CycleId, SelectedFile},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Predict,
    Recommend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Predict {
        error: WorkflowError,
    },
    /// The emotion was obtained before recommendations failed and stays visible.
    Recommend {
        emotion: EmotionLabel,
        error: WorkflowError,
    },
}

impl Failure {
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Predict { .. } => FailureStage::Predict,
            Self::Recommend { .. } => FailureStage::Recommend,
        }
    }

    pub fn error(&self) -> &WorkflowError {
        match self {
            Self::Predict { error } | Self::Recommend { error, .. } => error,
        }
    }

    pub fn message(&self) -> String {
        self.error().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    FileSelected,
    Predicting,
    Predicted {
        emotion: EmotionLabel,
    },
    RecommendationsLoading {
        emotion: EmotionLabel,
    },
    Ready {
        emotion: EmotionLabel,
        recommendations: RecommendationSet,
    },
    Failed(Failure),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FileSelected => "file_selected",
            Self::Predicting => "predicting",
            Self::Predicted { .. } => "predicted",
            Self::RecommendationsLoading { .. } => "recommendations_loading",
            Self::Ready { .. } => "ready",
            Self::Failed(_) => "failed",
        }
    }

    pub fn emotion(&self) -> Option<&EmotionLabel> {
        match self {
            Self::Predicted { emotion }
            | Self::RecommendationsLoading { emotion }
            | Self::Ready { emotion, .. }
            | Self::Failed(Failure::Recommend { emotion, .. }) => Some(emotion),
            Self::Idle | Self::FileSelected | Self::Predicting | Self::Failed(_) => None,
        }
    }

    pub fn recommendations(&self) -> Option<&RecommendationSet> {
        match self {
            Self::Ready {
                recommendations, ..
            } => Some(recommendations),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Predicting | Self::Predicted { .. } | Self::RecommendationsLoading { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    FileSelected,
    Submitted,
    PredictionSucceeded(EmotionLabel),
    PredictionFailed(WorkflowError),
    RecommendationRequested,
    RecommendationsReceived(RecommendationSet),
    RecommendationFailed(WorkflowError),
}

/// Transition table. `None` means the event is not accepted in `state`.
pub fn transition(state: &WorkflowState, event: WorkflowEvent) -> Option<WorkflowState> {
    use WorkflowEvent as E;
    use WorkflowState as S;

    let next = match (state, event) {
        (_, E::FileSelected) => S::FileSelected,
        (S::FileSelected | S::Ready { .. } | S::Failed(_), E::Submitted) => S::Predicting,
        (S::Predicting, E::PredictionSucceeded(emotion)) => S::Predicted { emotion },
        (S::Predicting, E::PredictionFailed(error)) => S::Failed(Failure::Predict { error }),
        (S::Predicted { emotion }, E::RecommendationRequested) => S::RecommendationsLoading {
            emotion: emotion.clone(),
        },
        (S::RecommendationsLoading { emotion }, E::RecommendationsReceived(recommendations)) => {
            S::Ready {
                emotion: emotion.clone(),
                recommendations,
            }
        }
        (S::RecommendationsLoading { emotion }, E::RecommendationFailed(error)) => {
            S::Failed(Failure::Recommend {
                emotion: emotion.clone(),
                error,
            })
        }
        _ => return None,
    };
    Some(next)
}

#[derive(Debug, Clone)]
pub struct PredictionTicket {
    pub cycle: CycleId,
    pub file: SelectedFile,
}

#[derive(Debug, Clone)]
pub struct RecommendationTicket {
    pub cycle: CycleId,
    pub emotion: EmotionLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The result belongs to a cycle that has since been replaced; it was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
    file: Option<SelectedFile>,
    cycle: CycleId,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    /// Replaces the held file and starts a new cycle. Any result still in
    /// flight for the previous cycle will be discarded on arrival.
    pub fn select_file(&mut self, file: SelectedFile) -> CycleId {
        if self.state.is_in_flight() {
            debug!(
                cycle = %self.cycle,
                filename = file.filename(),
                "file selected while analysis in flight; previous cycle invalidated"
            );
        }
        self.file = Some(file);
        self.cycle = self.cycle.next();
        self.apply(WorkflowEvent::FileSelected);
        self.cycle
    }

    pub fn begin_submit(&mut self) -> WorkflowResult<PredictionTicket> {
        if self.state.is_in_flight() {
            return Err(WorkflowError::SubmissionInFlight);
        }
        let file = self.file.clone().ok_or(WorkflowError::NoFileSelected)?;
        if !self.apply(WorkflowEvent::Submitted) {
            return Err(WorkflowError::NoFileSelected);
        }
        self.cycle = self.cycle.next();
        Ok(PredictionTicket {
            cycle: self.cycle,
            file,
        })
    }

    pub fn complete_prediction(
        &mut self,
        cycle: CycleId,
        result: WorkflowResult<EmotionLabel>,
    ) -> Completion {
        if !self.is_current(cycle, "prediction") {
            return Completion::Stale;
        }
        let event = match result {
            Ok(emotion) => WorkflowEvent::PredictionSucceeded(emotion),
            Err(error) => WorkflowEvent::PredictionFailed(error),
        };
        if self.apply(event) {
            Completion::Applied
        } else {
            Completion::Stale
        }
    }

    /// Moves `Predicted` to `RecommendationsLoading`. `None` when the
    /// prediction did not succeed for `cycle`.
    pub fn begin_recommendation(&mut self, cycle: CycleId) -> Option<RecommendationTicket> {
        if cycle != self.cycle {
            return None;
        }
        let emotion = match &self.state {
            WorkflowState::Predicted { emotion } => emotion.clone(),
            _ => return None,
        };
        self.apply(WorkflowEvent::RecommendationRequested)
            .then_some(RecommendationTicket { cycle, emotion })
    }

    pub fn complete_recommendation(
        &mut self,
        cycle: CycleId,
        result: WorkflowResult<RecommendationSet>,
    ) -> Completion {
        if !self.is_current(cycle, "recommendation") {
            return Completion::Stale;
        }
        let event = match result {
            Ok(recommendations) => WorkflowEvent::RecommendationsReceived(recommendations),
            Err(error) => WorkflowEvent::RecommendationFailed(error),
        };
        if self.apply(event) {
            Completion::Applied
        } else {
            Completion::Stale
        }
    }

    fn is_current(&self, cycle: CycleId, call: &'static str) -> bool {
        if cycle == self.cycle {
            return true;
        }
        debug!(
            call,
            result_cycle = %cycle,
            current_cycle = %self.cycle,
            "discarding result from superseded cycle"
        );
        false
    }

    fn apply(&mut self, event: WorkflowEvent) -> bool {
        match transition(&self.state, event) {
            Some(next) => {
                debug!(
                    cycle = %self.cycle,
                    from = self.state.name(),
                    to = next.name(),
                    "workflow transition"
                );
                self.state = next;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
