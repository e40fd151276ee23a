//! Terminal rendering of the client view model.

use std::fmt::Write as _;

use anyhow::Result;
use client_core::{view::ErrorBanner, FailureStage, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

pub fn render_view(view: &ViewModel, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(view)?,
        OutputFormat::Text => render_text(view),
    })
}

pub fn render_text(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Emotion based music recommendation system");
    if let Some(file) = &view.selected_file {
        let _ = writeln!(out, "File: {file}");
    }
    if view.analyzing {
        let _ = writeln!(out, "Analyzing audio...");
    }
    if let Some(emotion) = &view.emotion {
        let _ = writeln!(out, "Predicted Emotion: {emotion}");
    }
    if view.fetching_recommendations {
        let _ = writeln!(out, "Fetching recommendations...");
    }
    for card in &view.cards {
        let _ = writeln!(out, "{}: {}", card.heading, card.title);
        let _ = writeln!(out, "  {}", card.url);
        if let Some(thumbnail) = &card.thumbnail {
            let _ = writeln!(out, "  thumbnail: {thumbnail}");
        }
    }
    if view.stage == "ready" && view.cards.is_empty() {
        let _ = writeln!(out, "No recommendations found for this emotion.");
    }
    if let Some(banner) = &view.error_banner {
        let stage = match banner.stage {
            FailureStage::Predict => "prediction",
            FailureStage::Recommend => "recommendations",
        };
        let _ = writeln!(out, "Error ({stage}): {}", banner.message);
        if let Some(hint) = failure_hint(banner) {
            let _ = writeln!(out, "  {hint}");
        }
    }
    let _ = write!(
        out,
        "[{}]{}",
        view.submit_label,
        if view.submit_enabled { "" } else { " (disabled)" }
    );
    out
}

/// Suggests a next step for the user based on the failure text.
pub fn failure_hint(banner: &ErrorBanner) -> Option<&'static str> {
    let lower = banner.message.to_ascii_lowercase();
    if lower.contains("timed out")
        || lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
    {
        Some("Server unreachable; check --server-url and retry with `submit`.")
    } else if lower.contains("response invalid") {
        Some("The service answered with an unexpected payload; retry or choose another file.")
    } else if lower.contains("http 5") {
        Some("The service failed while processing; retry with `submit`.")
    } else if lower.contains("http 4") {
        Some("The service rejected the upload; try a different recording.")
    } else {
        None
    }
}
