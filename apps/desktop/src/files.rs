use std::path::Path;

use anyhow::{Context, Result};
use client_core::{types::DEFAULT_AUDIO_MIME, SelectedFile};

/// Reads an audio file from disk into a [`SelectedFile`], guessing the MIME
/// type from the extension.
pub async fn load_selected_file(path: &Path) -> Result<SelectedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read audio file '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.wav".to_string());

    SelectedFile::new(filename, Some(guess_mime(path)), bytes)
        .with_context(|| format!("cannot select '{}'", path.display()))
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::AUDIO)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string())
}
