use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use intake_spec::PersistenceGateway;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::UnconfiguredGateway;
use crate::file::FileGateway;

pub const ENV_GATEWAY_URL: &str = "INTAKE_GATEWAY_URL";
pub const ENV_GATEWAY_KEY: &str = "INTAKE_GATEWAY_KEY";
pub const ENV_GATEWAY_TABLE: &str = "INTAKE_GATEWAY_TABLE";
pub const ENV_GATEWAY_FILE: &str = "INTAKE_GATEWAY_FILE";

pub const DEFAULT_TABLE: &str = "questionnaire_responses";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid gateway url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Which gateway receives submitted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    Rest,
    File,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub kind: GatewayKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::None,
            url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            path: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Gateway settings loaded from `config.toml` and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub gateway: GatewayConfig,
}

/// `<config dir>/wellness-intake/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| {
        dirs.config_dir()
            .join("wellness-intake")
            .join("config.toml")
    })
}

impl StoreConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a config file that must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Loads the explicit file, or the default file when present, then applies
    /// environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `INTAKE_GATEWAY_*` overrides read through `lookup`.
    ///
    /// A url or file override selects its gateway kind when none was configured.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let gateway = &mut self.gateway;
        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            gateway.url = Some(url);
            if gateway.kind == GatewayKind::None {
                gateway.kind = GatewayKind::Rest;
            }
        }
        if let Some(key) = lookup(ENV_GATEWAY_KEY) {
            gateway.api_key = Some(key);
        }
        if let Some(table) = lookup(ENV_GATEWAY_TABLE) {
            gateway.table = table;
        }
        if let Some(path) = lookup(ENV_GATEWAY_FILE) {
            gateway.path = Some(PathBuf::from(path));
            if gateway.kind == GatewayKind::None {
                gateway.kind = GatewayKind::File;
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.timeout_secs.max(1))
    }

    /// Builds the configured gateway.
    ///
    /// Incomplete settings yield an [`UnconfiguredGateway`], so the form still
    /// runs and submission reports the store as unavailable.
    pub fn build_gateway(&self) -> Result<Box<dyn PersistenceGateway>, ConfigError> {
        let gateway = &self.gateway;
        debug!(kind = ?gateway.kind, "building persistence gateway");
        match gateway.kind {
            GatewayKind::None => Ok(Box::new(UnconfiguredGateway::new(
                "no persistence gateway configured",
            ))),
            GatewayKind::File => match &gateway.path {
                Some(path) => Ok(Box::new(FileGateway::new(path.clone()))),
                None => Ok(Box::new(UnconfiguredGateway::new(
                    "file gateway selected without a path",
                ))),
            },
            GatewayKind::Rest => self.build_rest_gateway(),
        }
    }

    #[cfg(feature = "http")]
    fn build_rest_gateway(&self) -> Result<Box<dyn PersistenceGateway>, ConfigError> {
        let gateway = &self.gateway;
        match (gateway.url.as_deref(), gateway.api_key.as_deref()) {
            (Some(url), Some(key)) => Ok(Box::new(crate::rest::RestGateway::new(
                url,
                &gateway.table,
                key,
                self.timeout(),
            )?)),
            _ => Ok(Box::new(UnconfiguredGateway::new(
                "rest gateway url or api key missing",
            ))),
        }
    }

    #[cfg(not(feature = "http"))]
    fn build_rest_gateway(&self) -> Result<Box<dyn PersistenceGateway>, ConfigError> {
        Ok(Box::new(UnconfiguredGateway::new(
            "rest gateway support not compiled in",
        )))
    }
}
