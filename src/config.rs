use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings for the generation backend, built once at startup and handed to
/// the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub relay: RelayConfig,
    /// JSON file of pull requests listed on the home page.
    pub pull_requests_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let max_tokens = match get("OPENAI_MAX_TOKENS") {
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "OPENAI_MAX_TOKENS",
                value,
            })?),
            None => None,
        };

        Ok(Self {
            relay: RelayConfig {
                api_key,
                api_base: get("OPENAI_API_BASE"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
            },
            pull_requests_path: get("DIFF_DIGEST_PULL_REQUESTS").map(PathBuf::from),
        })
    }
}
