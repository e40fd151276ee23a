use std::{fmt, sync::Arc};

use crate::error::{WorkflowError, WorkflowResult};

pub const DEFAULT_AUDIO_MIME: &str = "audio/wav";

/// Audio recording chosen by the user. The payload is shared so a retry does
/// not copy the bytes again.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    filename: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(
        filename: impl Into<String>,
        mime_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> WorkflowResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(WorkflowError::EmptyFile);
        }
        Ok(Self {
            filename: filename.into(),
            mime_type: mime_type.unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
            bytes,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Identifies one analysis attempt. Completions carrying an older id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CycleId(pub u64);

impl CycleId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
