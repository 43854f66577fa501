use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub sell_policy: SellPolicy,
    pub max_projection_years: u32,
}

/// What happens when a sell operation exceeds the held quantity.
///
/// `Allow` reproduces the historical behavior (the ledger goes negative
/// silently); `Reject` turns the append into a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellPolicy {
    Allow,
    Reject,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let sell_policy = match env_map
            .get("SELL_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("allow")
        {
            "allow" => SellPolicy::Allow,
            "reject" => SellPolicy::Reject,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SELL_POLICY".to_string(),
                    format!("must be allow or reject, got {}", other),
                ))
            }
        };

        let max_projection_years = env_map
            .get("MAX_PROJECTION_YEARS")
            .map(|s| s.as_str())
            .unwrap_or("100")
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_PROJECTION_YEARS".to_string(),
                    "must be a valid u32".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            sell_policy,
            max_projection_years,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.sell_policy, SellPolicy::Allow);
        assert_eq!(config.max_projection_years, 100);
    }

    #[test]
    fn test_missing_database_path() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_sell_policy_reject() {
        let mut env_map = setup_required_env();
        env_map.insert("SELL_POLICY".to_string(), "reject".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.sell_policy, SellPolicy::Reject);
    }

    #[test]
    fn test_invalid_sell_policy() {
        let mut env_map = setup_required_env();
        env_map.insert("SELL_POLICY".to_string(), "clamp".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SELL_POLICY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_max_projection_years_override() {
        let mut env_map = setup_required_env();
        env_map.insert("MAX_PROJECTION_YEARS".to_string(), "40".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.max_projection_years, 40);
    }
}
