//! Client side of the emotion recommendation flow: pick a recording, have the
//! remote classifier label it, then fetch music/movie/book suggestions for
//! that label.

pub mod config;
pub mod error;
mod orchestrator;
pub mod transport;
pub mod types;
pub mod view;
pub mod workflow;

pub use config::{load_settings, ClientSettings};
pub use error::{WorkflowError, WorkflowResult};
pub use orchestrator::{Orchestrator, StateChange, SubmitOutcome};
pub use transport::{EmotionService, HttpEmotionService};
pub use types::{CycleId, SelectedFile};
pub use view::{render, ViewModel};
pub use workflow::{Failure, FailureStage, Workflow, WorkflowState};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
