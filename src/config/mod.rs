// Configuration module entry point
// Loads config.toml with SERVER_-prefixed environment overrides
// (nested keys use a double underscore: SERVER_DISPATCH__ROOT_DIR)

mod types;

use std::net::SocketAddr;

pub use types::{
    Config, DispatchConfig, DocsConfig, HttpConfig, LoggingConfig, MountConfig,
    PerformanceConfig, ServerConfig,
};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// A missing file is not an error: defaults and environment apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "chorus")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("dispatch.root_dir", "./root")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Longest time a single connection may stay open
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.performance
                .read_timeout
                .max(self.performance.write_timeout),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/chorus-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.dispatch.root_dir, PathBuf::from("./root"));
        assert_eq!(cfg.dispatch.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.dispatch.docs.is_none());
        assert!(cfg.dispatch.mounts.is_empty());
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chorus.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 3000

[logging]
level = "debug"
access_log = false

[dispatch]
root_dir = "./site"

[dispatch.docs]
root = "song"
dir = "./SONG"
sections = ["veni", "vidi", "vici"]

[[dispatch.mounts]]
name = "demo"
dir = "./vici"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.performance.read_timeout, 30);
        let docs = cfg.dispatch.docs.unwrap();
        assert_eq!(docs.sections.len(), 3);
        assert_eq!(
            cfg.dispatch.mounts,
            vec![MountConfig {
                name: "demo".to_string(),
                dir: PathBuf::from("./vici"),
            }]
        );
    }
}
