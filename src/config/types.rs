// Configuration types module
// Typed view of config.toml plus SERVER_* environment overrides

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub dispatch: DispatchConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Per-connection limits, in seconds where applicable
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Dispatcher configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    /// Static fallback root
    pub root_dir: PathBuf,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    #[serde(default)]
    pub docs: Option<DocsConfig>,
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// Documentation pages served under `GET /<root>/`
#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    pub root: String,
    pub dir: PathBuf,
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Directory served for requests whose first path component is `name`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub name: String,
    pub dir: PathBuf,
}
