//! Layered configuration with environment-variable overrides.
//!
//! Precedence, lowest to highest: built-in defaults, a TOML file, the
//! environment (`HOST`, `PORT` / `SERVER_PORT`, `BASE_PATH`,
//! `USE_JOIN_FETCH`). `PORT` shadows `SERVER_PORT` when both are set.
//! Anything the caller mutates on the returned [`Config`] before handing it
//! to the server sits above all of these.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use figment::value::{Uncased, UncasedStr};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_PORT: u16 = 8080;

/// Top-level configuration for the benchmark service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Absent means the in-memory repositories are used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

/// Relation fetch strategy for the item listing scoped to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// When true the category-scoped item listing runs as a single joined
    /// query; when false each item row resolves its category individually.
    #[serde(default)]
    pub use_join_fetch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

fn default_service_name() -> String {
    "catalog-bench".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_path() -> String {
    "api".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout_secs() -> u64 {
    5
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_join_fetch: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            database: None,
        }
    }
}

impl Config {
    /// Load configuration from `config.toml` (if present) and the
    /// environment.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration from an explicit TOML path and the environment.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            // SERVER_PORT first so a later PORT merge wins over it.
            .merge(
                Env::raw()
                    .only(&["HOST", "SERVER_PORT", "BASE_PATH", "USE_JOIN_FETCH"])
                    .map(|key| map_env_key(key))
                    .split("."),
            )
            .merge(Env::raw().only(&["PORT"]).map(|key| map_env_key(key)).split("."))
            .extract()?;
        Ok(config)
    }
}

fn map_env_key(key: &UncasedStr) -> Uncased<'static> {
    match key.as_str().to_ascii_uppercase().as_str() {
        "HOST" => "server.host".into(),
        "PORT" | "SERVER_PORT" => "server.port".into(),
        "BASE_PATH" => "server.base_path".into(),
        "USE_JOIN_FETCH" => "fetch.use_join_fetch".into(),
        other => other.to_ascii_lowercase().into(),
    }
}

impl ServerConfig {
    /// Base path with leading and trailing slashes stripped.
    pub fn base_path(&self) -> &str {
        self.base_path.trim_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.base_path, "api");
        assert!(!config.fetch.use_join_fetch);
        assert!(config.database.is_none());
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn base_path_strips_slashes() {
        let mut server = ServerConfig::default();
        server.base_path = "/api/".to_string();
        assert_eq!(server.base_path(), "api");

        server.base_path = "//v1/api//".to_string();
        assert_eq!(server.base_path(), "v1/api");

        server.base_path = "/".to_string();
        assert_eq!(server.base_path(), "");
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HOST", "127.0.0.1");
            jail.set_env("SERVER_PORT", "9100");
            jail.set_env("BASE_PATH", "/bench/");
            jail.set_env("USE_JOIN_FETCH", "true");
            let config = Config::load_from("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.base_path(), "bench");
            assert!(config.fetch.use_join_fetch);
            Ok(())
        });
    }

    #[test]
    fn port_shadows_server_port() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SERVER_PORT", "9100");
            jail.set_env("PORT", "9200");
            let config = Config::load_from("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9200);
            Ok(())
        });
    }

    #[test]
    fn toml_file_sits_below_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [server]
                    port = 9000
                    base_path = "file"
                "#,
            )?;
            jail.set_env("PORT", "9300");
            let config = Config::load_from("config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9300);
            assert_eq!(config.server.base_path(), "file");
            Ok(())
        });
    }
}
