use serde::{Deserialize, Serialize};

/// Error envelope the emotion service returns alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub error: String,
}

impl ServiceError {
    /// Best-effort decode of an error body; `None` when the body is not the envelope.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|err| !err.error.trim().is_empty())
    }
}
