//! Server configuration
//!
//! Read from environment variables with defaults suitable for local
//! development.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::satellite::DEFAULT_BASE_URL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 10000;

/// Runtime configuration of the API server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory where uploaded photos are stored and served from
    pub uploads_dir: PathBuf,
    /// Directory holding the frontend (`index.html` and assets)
    pub static_dir: PathBuf,
    /// Optional JSON snapshot file for the spot store
    pub data_file: Option<PathBuf>,
    /// Insert sample spots into an empty store at startup
    pub seed_sample_data: bool,
    /// Environment name reported by the health endpoint
    pub environment: String,
    /// Map service used for satellite image URLs
    pub satellite_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            uploads_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("public"),
            data_file: None,
            seed_sample_data: true,
            environment: "development".to_string(),
            satellite_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `HOST`, `PORT`: bind address
    /// - `UPLOADS_DIR`: photo storage directory
    /// - `STATIC_DIR`: frontend directory
    /// - `DATA_FILE`: spot snapshot file (in-memory only when unset)
    /// - `SEED_SAMPLE_DATA`: `false`/`0`/`no` disables sample data
    /// - `APP_ENV`: environment name
    /// - `SATELLITE_BASE_URL`: map service for satellite images
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            uploads_dir: var("UPLOADS_DIR").map(PathBuf::from).unwrap_or(defaults.uploads_dir),
            static_dir: var("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            data_file: var("DATA_FILE").map(PathBuf::from),
            seed_sample_data: var("SEED_SAMPLE_DATA")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"))
                .unwrap_or(defaults.seed_sample_data),
            environment: var("APP_ENV").unwrap_or(defaults.environment),
            satellite_base_url: var("SATELLITE_BASE_URL").unwrap_or(defaults.satellite_base_url),
        }
    }

    /// Socket address to bind, falling back to all interfaces for an unparsable host
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 10000);
        assert!(config.seed_sample_data);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("UPLOADS_DIR", "/srv/uploads"),
            ("DATA_FILE", "data/spots.json"),
            ("SEED_SAMPLE_DATA", "false"),
            ("APP_ENV", "production"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.uploads_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.data_file, Some(PathBuf::from("data/spots.json")));
        assert!(!config.seed_sample_data);
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_invalid_port_and_blank_values() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "http"), ("HOST", "  ")]));
        assert_eq!(config.port, 10000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_bind_addr() {
        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3000");

        config.host = "localhost".to_string();
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
    }
}
