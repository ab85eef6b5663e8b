use crate::env::{self, Vars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: String,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
        }
    }
}

impl RedisConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let defaults = Self::default();
        Self {
            url: env::string(vars, "REDIS_URL"),
            host: env::string_or(vars, "REDIS_HOST", &defaults.host),
            port: env::parse(vars, "REDIS_PORT").unwrap_or(defaults.port),
            password: env::string(vars, "REDIS_PASSWORD").unwrap_or_default(),
            db: env::parse(vars, "REDIS_DB").unwrap_or(defaults.db),
        }
    }

    #[must_use]
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.password.is_empty() {
            return format!("redis://{}:{}/{}", self.host, self.port, self.db);
        }
        format!(
            "redis://:{}@{}:{}/{}",
            self.password, self.host, self.port, self.db
        )
    }
}
