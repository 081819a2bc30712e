use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use odo_registry::RegistryConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Default TCP port for the HTTP surface.
pub const DEFAULT_PORT: u16 = 7054;

/// Runtime configuration, usually read from `odo.toml`.
///
/// ```toml
/// bind_addr = "127.0.0.1:7054"
/// ledger_path = "odo-ledger.json"
///
/// [registry]
/// index_key = "readingIDIndex"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub ledger_path: PathBuf,
    pub registry: RegistryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            ledger_path: PathBuf::from("odo-ledger.json"),
            registry: RegistryConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file. Keys it does not set keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string(self).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7054".parse::<SocketAddr>().unwrap());
        assert_eq!(c.ledger_path, PathBuf::from("odo-ledger.json"));
        assert_eq!(c.registry.index_key, "readingIDIndex");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"

            [registry]
            index_key = "ids"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.ledger_path, PathBuf::from("odo-ledger.json"));
        assert_eq!(c.registry.index_key, "ids");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 5").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odo.toml");
        let mut config = ServerConfig::default();
        config.ledger_path = PathBuf::from("/var/lib/odo/ledger.json");
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ServerConfig::load("/nonexistent/odo.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
