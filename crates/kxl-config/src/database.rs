use crate::env::{self, Vars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 5432,
            name: "kxl".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let defaults = Self::default();
        Self {
            url: env::string(vars, "DATABASE_URL"),
            host: env::string_or(vars, "DB_HOST", &defaults.host),
            port: env::parse(vars, "DB_PORT").unwrap_or(defaults.port),
            name: env::string_or(vars, "DB_DATABASE", &defaults.name),
            username: env::string_or(vars, "DB_USERNAME", &defaults.username),
            password: env::string(vars, "DB_PASSWORD").unwrap_or_default(),
            max_connections: env::positive_or(
                vars,
                "DB_MAX_CONNECTIONS",
                u64::from(defaults.max_connections),
            )
            .try_into()
            .unwrap_or(defaults.max_connections),
        }
    }

    #[must_use]
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.password.is_empty() {
            return format!(
                "postgres://{}@{}:{}/{}",
                self.username, self.host, self.port, self.name
            );
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }
}
