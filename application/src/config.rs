//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::{
    domain::theme::ColorScheme,
    guard,
    infra::{storage, transport::client, Endpoints},
    Features,
};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Remote API configuration.
    #[serde(default)]
    pub api: Api,

    /// Toggled [`Features`].
    #[serde(default)]
    pub features: Features,

    /// Route guard configuration.
    #[serde(default)]
    pub guard: guard::Config,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// Appearance configuration.
    #[serde(default)]
    pub appearance: Appearance,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Returns the [`service::Config`] described by this [`Config`].
    #[must_use]
    pub fn service(&self) -> service::Config {
        service::Config {
            endpoints: self.api.endpoints.clone(),
            features: self.features,
            system_scheme: self.appearance.system_scheme,
        }
    }
}

/// Remote API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL every endpoint path is appended to.
    #[default("http://localhost:8080/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Paths of the remote API endpoints.
    pub endpoints: Endpoints,
}

impl From<&Api> for client::Config {
    fn from(value: &Api) -> Self {
        Self {
            base_url: value.base_url.clone(),
            timeout: value.timeout,
        }
    }
}

/// Appearance configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Appearance {
    /// [`ColorScheme`] preferred by the operating system, followed by the
    /// `auto` theme.
    pub system_scheme: ColorScheme,
}

/// Local storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// Path to the file the local state is persisted into.
    #[default(PathBuf::from("his-state.json"))]
    pub path: PathBuf,
}

impl From<Storage> for storage::File {
    fn from(value: Storage) -> Self {
        Self::new(value.path)
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    Info,

    /// Designates hazardous situations.
    #[default]
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
