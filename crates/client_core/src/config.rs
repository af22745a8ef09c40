use std::{fs, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the post service, always ending in `/`.
    pub server_url: Url,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: Url::parse("http://127.0.0.1:8080/").expect("static url"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientSettings {
    pub fn with_server_url(mut self, raw: &str) -> Result<Self> {
        self.server_url = parse_server_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `client.toml`, then environment variables.
pub fn load_client_settings() -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("invalid {SETTINGS_FILE}"))?;
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;

    Ok(settings)
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) -> Result<()> {
    let file: SettingsFile = toml::from_str(raw)?;
    if let Some(v) = file.server_url {
        settings.server_url = parse_server_url(&v)?;
    }
    if let Some(secs) = file.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }
    Ok(())
}

fn apply_env_overrides(
    settings: &mut ClientSettings,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(v) = var("BLOG_SERVER_URL") {
        settings.server_url = parse_server_url(&v)?;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = parse_server_url(&v)?;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.request_timeout = Duration::from_secs(secs),
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }
    Ok(())
}

fn parse_server_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("invalid server url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("server url '{raw}' must use http or https");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
