use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "planner.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub authorization: String,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080/api/".into(),
            authorization: "Basic planner".into(),
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    authorization: Option<String>,
    snapshot_path: Option<PathBuf>,
}

/// Defaults, then the TOML file at `path` if it exists, then the process
/// environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    Settings::resolve(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings in {}", path.display()))
}

impl Settings {
    /// Layers `file` and `env` over the defaults; later sources win.
    pub fn resolve(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut settings = Settings::default();

        if let Some(raw) = file {
            let file_cfg: FileSettings = toml::from_str(raw).context("malformed TOML")?;
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.authorization {
                settings.authorization = v;
            }
            if let Some(v) = file_cfg.snapshot_path {
                settings.snapshot_path = Some(v);
            }
        }

        if let Some(v) = env("PLANNER_SERVER_URL") {
            settings.server_url = v;
        }
        if let Some(v) = env("APP__SERVER_URL") {
            settings.server_url = v;
        }

        if let Some(v) = env("PLANNER_AUTHORIZATION") {
            settings.authorization = v;
        }
        if let Some(v) = env("APP__AUTHORIZATION") {
            settings.authorization = v;
        }

        if let Some(v) = env("APP__SNAPSHOT_PATH") {
            settings.snapshot_path = Some(PathBuf::from(v));
        }

        Ok(settings)
    }

    /// Command-line flags, the last layer.
    pub fn apply_overrides(
        &mut self,
        server_url: Option<String>,
        authorization: Option<String>,
        snapshot_path: Option<PathBuf>,
    ) {
        if let Some(v) = server_url {
            self.server_url = v;
        }
        if let Some(v) = authorization {
            self.authorization = v;
        }
        if let Some(v) = snapshot_path {
            self.snapshot_path = Some(v);
        }
    }

    pub fn server_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server url `{}`", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("server url must use http or https, got `{}`", url.scheme());
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
