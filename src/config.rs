use crate::generation::model::TEST_TYPES;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT: usize = 5003944;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: String, value: String },
}

/// Settings handed to the report generator with every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub default_test_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            default_test_type: TEST_TYPES[0].to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub body_limit: usize,
    pub generation: GenerationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
            generation: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Variables that are unset or blank keep their defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup = |name: &str| {
            vars.get(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = AppConfig::default();
        if let Some(addr) = lookup("CASEGEN_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(limit) = lookup("CASEGEN_BODY_LIMIT") {
            config.body_limit = match limit.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "CASEGEN_BODY_LIMIT".to_string(),
                        value: limit,
                    })
                }
            };
        }
        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            config.generation.api_key = api_key;
        }
        if let Some(model) = lookup("CASEGEN_MODEL") {
            config.generation.model = model;
        }
        if let Some(test_type) = lookup("CASEGEN_DEFAULT_TEST_TYPE") {
            config.generation.default_test_type = test_type;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_variables() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.generation.api_key, "");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("CASEGEN_BIND_ADDR", "127.0.0.1:8080"),
            ("CASEGEN_BODY_LIMIT", "1024"),
            ("GEMINI_API_KEY", " abc "),
            ("CASEGEN_MODEL", "gemini-2.0-pro"),
            ("CASEGEN_DEFAULT_TEST_TYPE", "Security Testing"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.body_limit, 1024);
        assert_eq!(config.generation.api_key, "abc");
        assert_eq!(config.generation.model, "gemini-2.0-pro");
        assert_eq!(config.generation.default_test_type, "Security Testing");
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = AppConfig::from_vars(vars(&[("CASEGEN_BIND_ADDR", "   ")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn rejects_bad_body_limit() {
        let result = AppConfig::from_vars(vars(&[("CASEGEN_BODY_LIMIT", "lots")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidNumber {
                name: "CASEGEN_BODY_LIMIT".to_string(),
                value: "lots".to_string(),
            })
        );
        assert!(AppConfig::from_vars(vars(&[("CASEGEN_BODY_LIMIT", "0")])).is_err());
    }
}
