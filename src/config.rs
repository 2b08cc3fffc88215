use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::view::{LatLng, ViewSettings, METERS_PER_MILE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid map center: {0}")]
    InvalidCenter(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// WebSocket endpoint; derived from `base_url` when absent.
    pub transport_url: Option<String>,
    /// Sent verbatim as the `Cookie` header on lookup requests.
    pub session_cookie: Option<String>,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(
        default = "default_reconnect_delay",
        deserialize_with = "deserialize_duration"
    )]
    pub reconnect_delay: Duration,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_reconnect_delay() -> Duration {
    Duration::from_secs(2)
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center")]
    pub initial_center: String,
    #[serde(default = "default_zoom")]
    pub initial_zoom: u8,
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,
}

fn default_center() -> String {
    "39.8283, -98.5795".to_string()
}

fn default_zoom() -> u8 {
    4
}

fn default_radius_miles() -> f64 {
    250.0
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_center: default_center(),
            initial_zoom: default_zoom(),
            radius_miles: default_radius_miles(),
        }
    }
}

impl MapConfig {
    pub fn center(&self) -> Result<LatLng, ConfigError> {
        LatLng::from_coordinates(&self.initial_center)
            .ok_or_else(|| ConfigError::InvalidCenter(self.initial_center.clone()))
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            initial_zoom: self.initial_zoom,
            radius_m: self.radius_miles * METERS_PER_MILE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Control,
    ViewStatus,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.map.center()?;
        Ok(config)
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }

    pub fn login_url(&self) -> String {
        format!(
            "{}{}",
            self.backend.base_url.trim_end_matches('/'),
            self.backend.login_path
        )
    }

    pub fn transport_url(&self) -> String {
        if let Some(url) = &self.backend.transport_url {
            return url.clone();
        }
        let base = self.backend.base_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/ws", base)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}
