use std::{fmt, fs, io, path::Path};

use anyhow::Context;
use panel_core::transport::normalize_server_url;
use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub region: Option<String>,
    pub bucket_name: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            region: None,
            bucket_name: None,
            access_key: None,
            secret_key: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server_url", &self.server_url)
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials are deliberately absent: they never live in a file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    region: Option<String>,
    bucket_name: Option<String>,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub server_url: Option<String>,
    pub region: Option<String>,
    pub bucket_name: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if file_cfg.region.is_some() {
                settings.region = file_cfg.region;
            }
            if file_cfg.bucket_name.is_some() {
                settings.bucket_name = file_cfg.bucket_name;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    if let Some(v) = env("PANEL_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("AWS_REGION") {
        settings.region = Some(v);
    }
    if let Some(v) = env("APP__REGION") {
        settings.region = Some(v);
    }

    if let Some(v) = env("APP__BUCKET_NAME") {
        settings.bucket_name = Some(v);
    }

    if let Some(v) = env("AWS_ACCESS_KEY_ID") {
        settings.access_key = Some(v);
    }
    if let Some(v) = env("AWS_SECRET_ACCESS_KEY") {
        settings.secret_key = Some(v);
    }

    Ok(settings)
}

impl Settings {
    pub fn apply(mut self, overrides: SettingsOverrides) -> anyhow::Result<Self> {
        if let Some(v) = overrides.server_url {
            self.server_url = v;
        }
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if overrides.bucket_name.is_some() {
            self.bucket_name = overrides.bucket_name;
        }
        if overrides.access_key.is_some() {
            self.access_key = overrides.access_key;
        }
        if overrides.secret_key.is_some() {
            self.secret_key = overrides.secret_key;
        }

        self.server_url = normalize_server_url(&self.server_url)
            .with_context(|| format!("invalid server_url '{}'", self.server_url))?;
        Ok(self)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
