//! Dogsync configuration objects.
use serde::Deserialize;
use serde::Serialize;

/// Dogsync process configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conf {
    /// Datadog site the connector syncs from, e.g. `datadoghq.com`.
    #[serde(default)]
    pub site: String,

    /// API key used to authenticate to the Datadog API.
    #[serde(default)]
    pub api_key: String,

    /// Application key paired with the API key to scope API access.
    #[serde(default)]
    pub app_key: String,

    /// Logging configuration for the process.
    #[serde(default)]
    pub log: LogConf,
}

/// Process logging configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LogConf {
    /// Minimum level emitted by the root logger.
    #[serde(default)]
    pub level: LogLevel,

    /// Format of emitted log records.
    #[serde(default)]
    pub mode: LogMode,
}

/// Minimum level emitted by the root logger.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,

    #[default]
    Info,

    Warning,
    Error,
}

/// Format of emitted log records.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Human friendly records on standard error.
    #[default]
    Term,

    /// One JSON record per line on standard error.
    Json,
}
