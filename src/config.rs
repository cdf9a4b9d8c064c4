//! Environment-derived configuration
//!
//! All credentials come from the process environment. Construction fails fast
//! with an error naming the missing variable so misconfiguration surfaces at
//! startup instead of on the first upstream call.

use thiserror::Error;

use crate::error::Error as CrateError;

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable holding the Weaviate API key
pub const WEAVIATE_API_KEY: &str = "WEAVIATE_API_KEY";

/// Environment variable holding the Weaviate endpoint URL
pub const WEAVIATE_URL: &str = "WEAVIATE_URL";

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),
}

impl From<ConfigError> for CrateError {
    fn from(err: ConfigError) -> Self {
        CrateError::Config(err.to_string())
    }
}

/// Credentials and endpoints resolved from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the OpenAI completion API
    pub openai_api_key: String,

    /// API key for the Weaviate instance
    pub weaviate_api_key: String,

    /// Base URL of the Weaviate instance
    pub weaviate_url: String,
}

impl Config {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name| get(name).ok_or(ConfigError::MissingVar(name));

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY)?,
            weaviate_api_key: require(WEAVIATE_API_KEY)?,
            weaviate_url: require(WEAVIATE_URL)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'static str, &'a str)]) -> impl Fn(&'static str) -> Option<String> + 'a {
        let map: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_vars_present() {
        let config = Config::from_lookup(lookup(&[
            (OPENAI_API_KEY, "sk-test"),
            (WEAVIATE_API_KEY, "wv-test"),
            (WEAVIATE_URL, "https://store.example.net"),
        ]))
        .unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.weaviate_api_key, "wv-test");
        assert_eq!(config.weaviate_url, "https://store.example.net");
    }

    #[test]
    fn test_missing_var_is_named() {
        let result = Config::from_lookup(lookup(&[
            (OPENAI_API_KEY, "sk-test"),
            (WEAVIATE_URL, "https://store.example.net"),
        ]));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("WEAVIATE_API_KEY"));
    }

    #[test]
    fn test_empty_environment_fails_on_first_var() {
        let result = Config::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingVar(OPENAI_API_KEY))));
    }
}
