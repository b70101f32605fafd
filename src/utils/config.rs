use crate::poll::PollSourceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Path of the optional JSON configuration file
pub const CONFIG_PATH_VAR: &str = "DRIVETUNES_CONFIG";

/// Server-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket the HTTP server listens on
    pub bind_address: String,
    /// Origin the browser reaches us at, used for OAuth redirects
    pub public_origin: String,
    pub vehicle: VehicleSettings,
    pub music: MusicSettings,
    pub poll: PollSettings,
}

/// Vehicle platform connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSettings {
    pub api_base_url: String,
    /// GraphQL endpoint for sharing grants
    pub identity_url: String,
    pub client_id: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

/// Music service OAuth client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub accounts_base_url: String,
    pub api_base_url: String,
    pub scopes: Vec<String>,
    pub request_timeout_secs: u64,
}

/// Background map polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Disabled when unset
    pub interval_secs: Option<u64>,
    pub source: PollSourceKind,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {parameter}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            public_origin: "http://localhost:5000".to_string(),
            vehicle: VehicleSettings::default(),
            music: MusicSettings::default(),
            poll: PollSettings::default(),
        }
    }
}

impl Default for VehicleSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.dimo.zone".to_string(),
            identity_url: "https://identity-api.dimo.zone/query".to_string(),
            client_id: None,
            api_key: None,
            request_timeout_secs: 30,
        }
    }
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            accounts_base_url: "https://accounts.spotify.com".to_string(),
            api_base_url: "https://api.spotify.com/v1".to_string(),
            scopes: vec![
                "user-read-private".to_string(),
                "user-read-email".to_string(),
                "playlist-modify-public".to_string(),
                "playlist-modify-private".to_string(),
            ],
            request_timeout_secs: 30,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: None,
            source: PollSourceKind::Store,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AppConfig {
    /// Defaults, then the file named by `DRIVETUNES_CONFIG`, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR).ok().and_then(non_empty) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }

    /// Apply overrides from `lookup`, normally the process environment
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).and_then(non_empty);

        if let Some(id) = var("DIMO_CLIENT_ID") {
            self.vehicle.client_id = Some(id);
        }
        if let Some(key) = var("DIMO_API_KEY") {
            self.vehicle.api_key = Some(key);
        }
        if let Some(id) = var("SPOTIFY_CLIENT_ID") {
            self.music.client_id = Some(id);
        }
        if let Some(secret) = var("SPOTIFY_CLIENT_SECRET") {
            self.music.client_secret = Some(secret);
        }
        if let Some(port) = var("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::InvalidParameter {
                parameter: "PORT".to_string(),
                value: port.clone(),
                reason: "not a port number".to_string(),
            })?;
            let host = self
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.bind_address = format!("{}:{}", host, port);
        }
        if let Some(origin) = var("PUBLIC_ORIGIN") {
            self.public_origin = origin.trim_end_matches('/').to_string();
        }
        if let Some(secs) = var("POLL_INTERVAL_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidParameter {
                parameter: "POLL_INTERVAL_SECS".to_string(),
                value: secs.clone(),
                reason: "not a whole number of seconds".to_string(),
            })?;
            self.poll.interval_secs = Some(secs);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidParameter {
                parameter: "bind_address".to_string(),
                value: self.bind_address.clone(),
                reason: "not a socket address".to_string(),
            });
        }
        if self.poll.interval_secs == Some(0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "poll.interval_secs".to_string(),
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }
        for (parameter, secs) in [
            ("vehicle.request_timeout_secs", self.vehicle.request_timeout_secs),
            ("music.request_timeout_secs", self.music.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: "0".to_string(),
                    reason: "must be at least one second".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Redirect URI registered with the music service
    pub fn music_redirect_uri(&self) -> String {
        format!("{}/api/music/callback", self.public_origin.trim_end_matches('/'))
    }
}
