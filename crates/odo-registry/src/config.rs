use serde::{Deserialize, Serialize};

/// Ledger key the ID index is stored under unless configured otherwise.
pub const DEFAULT_INDEX_KEY: &str = "readingIDIndex";

/// Configuration for a reading registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Ledger key of the ID index. Readings may not use this key.
    pub index_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn with_index_key(index_key: impl Into<String>) -> Self {
        Self {
            index_key: index_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_index_key() {
        assert_eq!(RegistryConfig::default().index_key, "readingIDIndex");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }
}
