//! Server configuration loading from file and environment variables.

use barista_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Order storage settings.
    #[serde(default)]
    pub orders: OrdersConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LiveKit credentials. An empty URL disables room features.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Web frontend settings.
    #[serde(default)]
    pub frontend: FrontendConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where order files are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    /// Directory holding `order_*.json` files.
    #[serde(default = "default_orders_dir")]
    pub dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "barista_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Static frontend serving.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendConfig {
    /// Directory with a built frontend (`index.html` at its root). Not served
    /// when unset or missing.
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_orders_dir() -> String {
    "orders".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            dir: default_orders_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `BARISTA_HOST` overrides `server.host`
/// - `BARISTA_PORT` overrides `server.port`
/// - `BARISTA_ORDERS_DIR` overrides `orders.dir`
/// - `BARISTA_LOG_LEVEL` overrides `logging.level`
/// - `BARISTA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `BARISTA_FRONTEND_DIR` overrides `frontend.dir`
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override the
///   matching `livekit` keys
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = read_config_file(path)?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Reads the TOML file at `path` without applying environment overrides.
/// A missing file, or no path at all, yields the defaults.
fn read_config_file(path: Option<&str>) -> Result<Config, ConfigError> {
    Ok(match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    })
}

/// Applies environment overrides, reading variables through `var`.
pub fn apply_env_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(host) = var("BARISTA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = var("BARISTA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = var("BARISTA_ORDERS_DIR") {
        config.orders.dir = dir;
    }
    if let Some(level) = var("BARISTA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("BARISTA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(dir) = var("BARISTA_FRONTEND_DIR") {
        config.frontend.dir = Some(dir);
    }
    if let Some(url) = var("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = var("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = var("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_no_path() {
        let config = apply_env_overrides(read_config_file(None).unwrap(), |_| None);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.orders.dir, "orders");
        assert_eq!(config.logging.level, "info");
        assert!(config.frontend.dir.is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.toml");
        let config = read_config_file(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.host, default_host());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("barista.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = read_config_file(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn file_values_are_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("barista.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                port = 8081

                [orders]
                dir = "/var/lib/barista"

                [livekit]
                url = "wss://cafe.livekit.cloud"
                api_key = "APIabc"
                api_secret = "s3cret"
                token_ttl_seconds = 60
            "#,
        )
        .unwrap();

        let config = read_config_file(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.orders.dir, "/var/lib/barista");
        assert_eq!(config.livekit.url, "wss://cafe.livekit.cloud");
        assert_eq!(config.livekit.token_ttl_seconds, 60);
    }

    #[test]
    fn environment_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BARISTA_HOST", "0.0.0.0"),
            ("BARISTA_PORT", "9000"),
            ("BARISTA_ORDERS_DIR", "/tmp/orders"),
            ("BARISTA_LOG_JSON", "1"),
            ("LIVEKIT_URL", "ws://localhost:7880"),
            ("LIVEKIT_API_KEY", "devkey"),
            ("LIVEKIT_API_SECRET", "secret"),
        ]);

        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.orders.dir, "/tmp/orders");
        assert!(config.logging.json);
        assert_eq!(config.livekit.url, "ws://localhost:7880");
        assert_eq!(config.livekit.api_secret, "secret");
    }

    #[test]
    fn unparseable_port_override_is_ignored() {
        let config = apply_env_overrides(Config::default(), |key| {
            (key == "BARISTA_PORT").then(|| "espresso".to_string())
        });
        assert_eq!(config.server.port, 3000);
    }
}
