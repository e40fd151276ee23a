//! HTTP adapter for the prediction and recommendation endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{EmotionLabel, RecommendationSet},
    error::ServiceError,
    protocol::{
        PredictResponse, RecommendationRequest, RecommendationsResponse, AUDIO_FIELD,
        PREDICT_PATH, RECOMMENDATIONS_PATH,
    },
};
use tracing::{debug, info};

use crate::{
    config::ClientSettings,
    error::{WorkflowError, WorkflowResult},
    types::SelectedFile,
};

/// Remote collaborator behind the orchestrator. Implementations never retry.
#[async_trait]
pub trait EmotionService: Send + Sync {
    async fn predict(&self, file: &SelectedFile) -> WorkflowResult<EmotionLabel>;
    async fn recommend(&self, emotion: &EmotionLabel) -> WorkflowResult<RecommendationSet>;
}

pub struct HttpEmotionService {
    http: Client,
    server_url: String,
}

impl HttpEmotionService {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        let server_url = server_url.into().trim_end_matches('/').to_string();
        info!(%server_url, timeout_secs = timeout.as_secs(), "emotion service client ready");
        Ok(Self { http, server_url })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::new(settings.server_url.clone(), settings.request_timeout())
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl EmotionService for HttpEmotionService {
    async fn predict(&self, file: &SelectedFile) -> WorkflowResult<EmotionLabel> {
        let server_url = &self.server_url;
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.filename().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| {
                WorkflowError::PredictionRequestFailed(format!(
                    "invalid mime type '{}': {e}",
                    file.mime_type()
                ))
            })?;
        let form = Form::new().part(AUDIO_FIELD, part);

        debug!(
            filename = file.filename(),
            size_bytes = file.len(),
            "uploading audio for prediction"
        );
        let response = self
            .http
            .post(format!("{server_url}{PREDICT_PATH}"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| WorkflowError::PredictionRequestFailed(describe_transport_error(&e)))?;
        let body = success_body(response)
            .await
            .map_err(WorkflowError::PredictionRequestFailed)?;

        let parsed: PredictResponse =
            decode_object(&body, None).map_err(WorkflowError::PredictionResponseInvalid)?;
        let raw = parsed.emotion.ok_or_else(|| {
            WorkflowError::PredictionResponseInvalid("missing `emotion` field".to_string())
        })?;
        EmotionLabel::new(raw).map_err(|e| WorkflowError::PredictionResponseInvalid(e.to_string()))
    }

    async fn recommend(&self, emotion: &EmotionLabel) -> WorkflowResult<RecommendationSet> {
        let server_url = &self.server_url;
        let response = self
            .http
            .post(format!("{server_url}{RECOMMENDATIONS_PATH}"))
            .json(&RecommendationRequest {
                emotion: emotion.clone(),
            })
            .send()
            .await
            .map_err(|e| {
                WorkflowError::RecommendationRequestFailed(describe_transport_error(&e))
            })?;
        let body = success_body(response)
            .await
            .map_err(WorkflowError::RecommendationRequestFailed)?;

        let parsed: RecommendationsResponse = decode_object(&body, Some("recommendations"))
            .map_err(WorkflowError::RecommendationResponseInvalid)?;
        debug!(
            %emotion,
            categories = parsed.recommendations.len(),
            "recommendations received"
        );
        Ok(parsed.recommendations)
    }
}

/// Reads the body of a 2xx response, or describes why the call failed.
async fn success_body(response: Response) -> std::result::Result<Vec<u8>, String> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| describe_transport_error(&e))?;
    if status.is_success() {
        return Ok(body.to_vec());
    }
    Err(match ServiceError::from_body(&body) {
        Some(err) => format!("HTTP {status}: {}", err.error),
        None => format!("HTTP {status}"),
    })
}

/// Decodes `body` into `T`, insisting the body (and `nested_key`, if given)
/// is a JSON object. Derived `Deserialize` would otherwise accept arrays.
fn decode_object<T: DeserializeOwned>(
    body: &[u8],
    nested_key: Option<&str>,
) -> std::result::Result<T, String> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("malformed JSON body: {e}"))?;
    if !value.is_object() {
        return Err("response body is not a JSON object".to_string());
    }
    if let Some(key) = nested_key {
        if !value.get(key).is_some_and(Value::is_object) {
            return Err(format!("`{key}` must be a JSON object"));
        }
    }
    serde_json::from_value(value).map_err(|e| format!("unexpected response shape: {e}"))
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("failed to connect to emotion service: {err}")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
