use std::env;

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// What a reducer chain does when no case matches an action.
///
/// State is returned unchanged under every policy; only the diagnostic differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhandledPolicy {
    Ignore,
    #[default]
    Trace,
    Warn,
}

impl UnhandledPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Some(Self::Ignore),
            "trace" => Some(Self::Trace),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }
}

/// Engine configuration. Every field has a default, so an empty environment
/// is a valid configuration.
#[derive(Debug, Clone, Deserialize, TypedBuilder)]
pub struct Config {
    #[builder(default)]
    #[serde(default)]
    pub unhandled: UnhandledPolicy,

    /// Label attached to store log lines.
    #[builder(default = default_store_name(), setter(into))]
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `TRELLIS_UNHANDLED_ACTIONS`: `ignore`, `trace` (default) or `warn`
    /// - `TRELLIS_STORE_NAME`: label for store log lines (default `store`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let unhandled = match lookup("TRELLIS_UNHANDLED_ACTIONS") {
            None => UnhandledPolicy::default(),
            Some(value) => {
                UnhandledPolicy::parse(&value).ok_or_else(|| ConfigError::InvalidEnv {
                    var: "TRELLIS_UNHANDLED_ACTIONS".to_string(),
                    value,
                })?
            }
        };
        let store_name = lookup("TRELLIS_STORE_NAME").unwrap_or_else(default_store_name);

        Ok(Self {
            unhandled,
            store_name,
        })
    }
}

fn default_store_name() -> String {
    "store".to_string()
}
