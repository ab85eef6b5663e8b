use crate::ConfigError;
use crate::env::{self, Vars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the time spent serving one request.
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            request_timeout_seconds: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match env::string(vars, "SERVER_PORT") {
            None => defaults.port,
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SERVER_PORT",
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            host: env::string_or(vars, "SERVER_HOST", &defaults.host),
            port,
            request_timeout_seconds: env::positive_or(
                vars,
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
        })
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::test_vars::from_pairs;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8787");
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn test_custom_address() {
        let vars = from_pairs(&[("SERVER_HOST", "127.0.0.1"), ("SERVER_PORT", "9000")]);
        let config = ServerConfig::from_vars(&vars).unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_non_numeric_port() {
        let vars = from_pairs(&[("SERVER_PORT", "http")]);
        assert!(ServerConfig::from_vars(&vars).is_err());
    }
}
