use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    config::ClientSettings,
    error::WorkflowResult,
    transport::{EmotionService, HttpEmotionService},
    types::{CycleId, SelectedFile},
    view::{render_workflow, ViewModel},
    workflow::{Completion, Workflow, WorkflowState},
};

const STATE_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub cycle: CycleId,
    pub state: WorkflowState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The cycle ran to `Ready` or `Failed`.
    Finished(WorkflowState),
    /// A newer file selection replaced this cycle before it finished.
    Superseded,
}

/// Drives one [`Workflow`] against an [`EmotionService`]. The workflow lock is
/// never held across a network call, so `select_file` and `view` stay
/// responsive while a cycle is in flight.
pub struct Orchestrator {
    service: Arc<dyn EmotionService>,
    workflow: Mutex<Workflow>,
    events: broadcast::Sender<StateChange>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn EmotionService>) -> Self {
        let (events, _) = broadcast::channel(STATE_EVENT_CAPACITY);
        Self {
            service,
            workflow: Mutex::new(Workflow::new()),
            events,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let service = HttpEmotionService::from_settings(settings)?;
        Ok(Self::new(Arc::new(service)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> WorkflowState {
        self.workflow.lock().await.state().clone()
    }

    pub async fn selected_file(&self) -> Option<SelectedFile> {
        self.workflow.lock().await.selected_file().cloned()
    }

    pub async fn view(&self) -> ViewModel {
        render_workflow(&*self.workflow.lock().await)
    }

    pub async fn select_file(&self, file: SelectedFile) -> CycleId {
        let mut workflow = self.workflow.lock().await;
        info!(
            filename = file.filename(),
            mime_type = file.mime_type(),
            size_bytes = file.len(),
            "audio file selected"
        );
        let cycle = workflow.select_file(file);
        self.publish(&workflow);
        cycle
    }

    /// Runs predict then recommend for the held file. Returns
    /// `Err(NoFileSelected)` or `Err(SubmissionInFlight)` without touching
    /// state when there is nothing to do.
    pub async fn submit(&self) -> WorkflowResult<SubmitOutcome> {
        let ticket = {
            let mut workflow = self.workflow.lock().await;
            let ticket = workflow.begin_submit()?;
            self.publish(&workflow);
            ticket
        };
        let cycle = ticket.cycle;
        info!(
            %cycle,
            filename = ticket.file.filename(),
            "analysis started"
        );

        let prediction = self.service.predict(&ticket.file).await;

        let ticket = {
            let mut workflow = self.workflow.lock().await;
            if workflow.complete_prediction(cycle, prediction) == Completion::Stale {
                return Ok(SubmitOutcome::Superseded);
            }
            self.publish(&workflow);
            match workflow.begin_recommendation(cycle) {
                Some(ticket) => {
                    self.publish(&workflow);
                    ticket
                }
                None => return Ok(self.finish(&workflow)),
            }
        };

        let recommendations = self.service.recommend(&ticket.emotion).await;

        let mut workflow = self.workflow.lock().await;
        if workflow.complete_recommendation(cycle, recommendations) == Completion::Stale {
            return Ok(SubmitOutcome::Superseded);
        }
        self.publish(&workflow);
        Ok(self.finish(&workflow))
    }

    fn finish(&self, workflow: &Workflow) -> SubmitOutcome {
        let state = workflow.state().clone();
        match state.failure() {
            Some(failure) => warn!(
                cycle = %workflow.cycle(),
                stage = ?failure.stage(),
                error = %failure.error(),
                "analysis failed"
            ),
            None => info!(
                cycle = %workflow.cycle(),
                emotion = state.emotion().map(|e| e.as_str()).unwrap_or_default(),
                categories = state.recommendations().map(|r| r.len()).unwrap_or_default(),
                "analysis finished"
            ),
        }
        SubmitOutcome::Finished(state)
    }

    fn publish(&self, workflow: &Workflow) {
        // No subscribers is fine.
        let _ = self.events.send(StateChange {
            cycle: workflow.cycle(),
            state: workflow.state().clone(),
        });
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
