//! Pure projection of the workflow into what a front end should show.

use serde::Serialize;
use shared::domain::RecommendationCategory;

use crate::{
    types::SelectedFile,
    workflow::{FailureStage, Workflow, WorkflowState},
};

pub const SUBMIT_LABEL_IDLE: &str = "Upload & Analyze";
pub const SUBMIT_LABEL_BUSY: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationCard {
    pub category: RecommendationCategory,
    pub heading: &'static str,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub stage: &'static str,
    /// Always shown; picking a new file mid-analysis supersedes the running cycle.
    pub show_upload_form: bool,
    pub selected_file: Option<String>,
    pub analyzing: bool,
    /// Predicted-emotion panel; `None` hides it.
    pub emotion: Option<String>,
    pub fetching_recommendations: bool,
    pub cards: Vec<RecommendationCard>,
    pub error_banner: Option<ErrorBanner>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

pub fn render_workflow(workflow: &Workflow) -> ViewModel {
    render(workflow.state(), workflow.selected_file())
}

pub fn render(state: &WorkflowState, selected_file: Option<&SelectedFile>) -> ViewModel {
    let in_flight = state.is_in_flight();

    let cards: Vec<RecommendationCard> = state
        .recommendations()
        .map(|set| {
            set.iter()
                .map(|(category, rec)| RecommendationCard {
                    category,
                    heading: category.heading(),
                    title: rec.title.clone(),
                    url: rec.url.clone(),
                    thumbnail: rec.thumbnail.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let error_banner = state.failure().map(|failure| ErrorBanner {
        stage: failure.stage(),
        message: failure.message(),
    });

    ViewModel {
        stage: state.name(),
        show_upload_form: true,
        selected_file: selected_file.map(|file| file.filename().to_string()),
        analyzing: matches!(state, WorkflowState::Predicting),
        emotion: state.emotion().map(|emotion| emotion.to_string()),
        fetching_recommendations: matches!(
            state,
            WorkflowState::Predicted { .. } | WorkflowState::RecommendationsLoading { .. }
        ),
        cards,
        error_banner,
        submit_enabled: selected_file.is_some() && !in_flight,
        submit_label: if in_flight {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL_IDLE
        },
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
