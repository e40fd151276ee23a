use serde::{Deserialize, Serialize};

use crate::domain::{EmotionLabel, RecommendationSet};

pub const PREDICT_PATH: &str = "/predict";
pub const RECOMMENDATIONS_PATH: &str = "/get_recommendations";
/// Multipart field the prediction service reads the recording from.
pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub emotion: EmotionLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: RecommendationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
