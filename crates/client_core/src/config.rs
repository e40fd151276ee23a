use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "emotion-client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the server URL and timeout, normalizing the URL in place.
    pub fn validate(&mut self) -> Result<()> {
        let url = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "server url '{}' must use http or https, got '{}'",
                self.server_url,
                url.scheme()
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        self.server_url = url.as_str().trim_end_matches('/').to_string();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Loads `emotion-client.toml` from the working directory (if present), then
/// applies environment overrides.
pub fn load_settings() -> Result<ClientSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let mut settings = layer_settings(raw.as_deref(), env)
        .with_context(|| format!("failed to load settings from '{}'", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

fn layer_settings(
    file_raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_raw {
        let file_cfg: FileSettings = toml::from_str(raw).context("malformed settings file")?;
        if let Some(v) = file_cfg.server_url {
            settings.server_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("EMOTION_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
