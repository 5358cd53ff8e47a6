//! Configuration management for ReceiptChain

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    1911
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.network.bind_address.is_empty() {
            return Err(ChainError::Config(
                "network.bind_address must not be empty".to_string(),
            ));
        }
        self.network
            .bind_address
            .parse::<IpAddr>()
            .map_err(|e| ChainError::Config(format!("Invalid network.bind_address: {}", e)))?;
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level, ChainError> {
        self.logging
            .level
            .parse()
            .map_err(|_| ChainError::Config(format!("Unknown log level '{}'", self.logging.level)))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ChainError> {
        let ip: IpAddr = self
            .network
            .bind_address
            .parse()
            .map_err(|e| ChainError::Config(format!("Invalid network.bind_address: {}", e)))?;
        Ok(SocketAddr::new(ip, self.network.api_port))
    }

    /// Apply the `PORT` environment variable, if it holds a valid port.
    pub fn apply_env(&mut self) {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.network.api_port = port;
        }
    }
}

/// Load `path`, falling back to defaults when the file is absent.
pub fn load_config_from(path: &Path) -> Result<Config, ChainError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    Config::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.network.api_port, 1911);
        assert_eq!(config.network.bind_address, "0.0.0.0");
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.socket_addr().unwrap().port(), 1911);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[network]\napi_port = 8080\n").unwrap();
        assert_eq!(config.network.api_port, 8080);
        assert_eq!(config.network.bind_address, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml("[logging]\nlevel = \"chatty\"\n").is_err());
        assert!(Config::from_toml("[network]\nbind_address = \"\"\n").is_err());
        assert!(Config::from_toml("[network]\nbind_address = \"nowhere\"\n").is_err());
        assert!(Config::from_toml("[network]\napi_port = \"x\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path)?;
        writeln!(file, "[network]\nbind_address = \"127.0.0.1\"\napi_port = 4000")?;
        writeln!(file, "[logging]\nlevel = \"debug\"")?;

        let config = load_config_from(&path)?;
        assert_eq!(config.socket_addr()?, "127.0.0.1:4000".parse::<SocketAddr>()?);
        assert_eq!(config.log_level()?, tracing::Level::DEBUG);
        Ok(())
    }

    #[test]
    fn test_missing_file_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let config = load_config_from(&dir.path().join("absent.toml"))?;
        assert_eq!(config.network.api_port, 1911);
        Ok(())
    }
}
