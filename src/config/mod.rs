use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub epg: EpgConfig,
    #[serde(default)]
    pub web: WebConfig,
    /// Request timeout for provider and feed calls; unset means no timeout
    #[serde(default, with = "duration_serde::option_duration")]
    pub http_timeout: Option<Duration>,
}

/// Xtream Codes provider credentials. All three fields are required.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub server_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("username", &self.username)
            .field("password", &"****")
            .field("server_url", &self.server_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpgConfig {
    /// XMLTV feed; EPG annotation is disabled when unset
    #[serde(default)]
    pub url: Option<String>,
    #[serde(
        default = "default_epg_refresh_interval",
        with = "duration_serde::duration"
    )]
    pub refresh_interval: Duration,
    /// Programmes must start within `[now, now + window]` to be kept
    #[serde(default = "default_epg_window", with = "duration_serde::duration")]
    pub window: Duration,
    #[serde(default = "default_max_programmes_per_channel")]
    pub max_programmes_per_channel: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_epg_refresh_interval() -> Duration {
    DEFAULT_EPG_REFRESH_INTERVAL
}

fn default_epg_window() -> Duration {
    DEFAULT_EPG_WINDOW
}

fn default_max_programmes_per_channel() -> usize {
    DEFAULT_MAX_PROGRAMMES_PER_CHANNEL
}

impl Default for EpgConfig {
    fn default() -> Self {
        Self {
            url: None,
            refresh_interval: default_epg_refresh_interval(),
            window: default_epg_window(),
            max_programmes_per_channel: default_max_programmes_per_channel(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Values supplied through the environment or the command line.
///
/// These take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub server_url: Option<String>,
    pub epg_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Build the effective configuration: defaults, then the optional file,
    /// then overrides. Fails when any required provider value is missing.
    pub fn load(config_file: Option<&Path>, overrides: ConfigOverrides) -> AppResult<Self> {
        let mut config = match config_file {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                info!("Configuration loaded from: {}", path.display());
                config
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(config_file: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(config_file).map_err(|e| {
            AppError::configuration(format!(
                "Cannot read config file {}: {e}",
                config_file.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            AppError::configuration(format!(
                "Invalid config file {}: {e}",
                config_file.display()
            ))
        })
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(username) = overrides.username {
            self.provider.username = username;
        }
        if let Some(password) = overrides.password {
            self.provider.password = password;
        }
        if let Some(server_url) = overrides.server_url {
            self.provider.server_url = server_url;
        }
        if let Some(epg_url) = overrides.epg_url {
            self.epg.url = Some(epg_url);
        }
        if let Some(host) = overrides.host {
            self.web.host = host;
        }
        if let Some(port) = overrides.port {
            self.web.port = port;
        }
    }

    fn normalize(&mut self) {
        self.provider.server_url = self
            .provider
            .server_url
            .trim()
            .trim_end_matches('/')
            .to_string();

        // An empty EPG_URL disables EPG the same way an absent one does
        if self
            .epg
            .url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.epg.url = None;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let missing: Vec<&str> = [
            (ENV_USERNAME, &self.provider.username),
            (ENV_PASSWORD, &self.provider.password),
            (ENV_SERVER, &self.provider.server_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if self.epg.max_programmes_per_channel == 0 {
            return Err(AppError::configuration(
                "epg.max_programmes_per_channel must be at least 1",
            ));
        }

        if self.epg.refresh_interval.is_zero() {
            return Err(AppError::configuration(
                "epg.refresh_interval must be greater than zero",
            ));
        }

        Ok(())
    }
}
