use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// Lower-cases bare level names (accepting `warning`); anything else is
    /// passed through as filter directives.
    pub(crate) fn normalize_level(input: &str) -> String {
        let level = input.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        let lower = level.to_ascii_lowercase();
        if lower == "warning" {
            return "warn".to_owned();
        }
        if matches!(lower.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return lower;
        }
        level.to_owned()
    }

    /// The filter [`init_tracing`] installs.
    ///
    /// Candidates are tried in order: the configured level followed by
    /// `RUST_LOG`, `RUST_LOG` alone, the configured level alone. When none
    /// parses, everything at `info` and above is kept.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = Self::normalize_level(&self.level);
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut candidates = Vec::with_capacity(3);
        if let Some(from_env) = from_env {
            candidates.push(format!("{configured},{from_env}"));
            candidates.push(from_env);
        }
        candidates.push(configured);

        candidates
            .iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

/// Installs a global `tracing` subscriber writing to stderr.
///
/// Only the first call has an effect; a subscriber installed by the embedding
/// application beforehand is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_writer(std::io::stderr);
        let result = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if result.is_err() {
            tracing::debug!(
                target = "supertype.config",
                "global tracing subscriber already installed"
            );
        }
    });
}
