//! Configuration for the class hierarchy resolver, loaded from TOML.

use std::path::Path;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{init_tracing, LoggingConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_owned())
    }
}

/// Top-level configuration.
///
/// ```toml
/// [cache]
/// node_capacity = 4096
///
/// [[special_interfaces]]
/// name = "com/example/Marker"
/// interfaces = []
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    /// Marker interfaces ranked below ordinary interfaces, in addition to the
    /// built-in JDK ones (`Serializable`, `Cloneable`, ...).
    #[serde(default)]
    pub special_interfaces: Vec<SpecialInterfaceConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HierarchyConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: HierarchyConfig = toml::from_str(text)?;
        warn_on_suspicious_values(&config);
        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Number of type nodes kept strongly reachable by the node store.
    ///
    /// Nodes beyond this bound are only weakly held and get rebuilt from
    /// class metadata once nothing else references them. `0` disables strong
    /// retention entirely.
    #[serde(default = "CacheConfig::default_node_capacity")]
    pub node_capacity: usize,
}

impl CacheConfig {
    fn default_node_capacity() -> usize {
        4_096
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            node_capacity: Self::default_node_capacity(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialInterfaceConfig {
    /// Internal name, e.g. `com/example/Marker`.
    pub name: String,

    /// Internal names of the interfaces it extends.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

fn warn_on_suspicious_values(config: &HierarchyConfig) {
    static ZERO_CAPACITY: Once = Once::new();
    if config.cache.node_capacity == 0 {
        ZERO_CAPACITY.call_once(|| {
            tracing::warn!(
                target = "supertype.config",
                "cache.node_capacity = 0; type nodes are re-read once no query holds them"
            );
        });
    }
    for special in &config.special_interfaces {
        if special.name.contains('.') {
            tracing::warn!(
                target = "supertype.config",
                name = %special.name,
                "special interface names use internal form (`a/b/C`), not dotted form"
            );
        }
    }
}
