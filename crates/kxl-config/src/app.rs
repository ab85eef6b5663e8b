use crate::env::{self, Vars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub env: String,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            debug: true,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let defaults = Self::default();
        Self {
            env: env::string_or(vars, "APP_ENV", &defaults.env).to_ascii_lowercase(),
            debug: env::flag_or(vars, "APP_DEBUG", defaults.debug),
        }
    }

    /// Production hides internal error detail from clients.
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self.env.as_str(), "production" | "prod")
    }
}
