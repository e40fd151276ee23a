//! Controller layer: typed UI commands from stdin dispatched to the orchestrator.

pub mod commands;
mod session;

pub use session::run_interactive;
