use crate::env::{self, Vars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins; `*` mirrors whatever origin the request carries.
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let allow_origins: Vec<String> = env::string(vars, "CORS_ALLOW_ORIGIN")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if allow_origins.is_empty() {
            return Self::default();
        }
        Self { allow_origins }
    }

    #[must_use]
    pub fn allows_any(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::test_vars::from_pairs;

    #[test]
    fn test_default_allows_any() {
        assert!(CorsConfig::default().allows_any());
    }

    #[test]
    fn test_origin_list() {
        let vars = from_pairs(&[(
            "CORS_ALLOW_ORIGIN",
            "https://kxl.example, https://admin.kxl.example,",
        )]);
        let config = CorsConfig::from_vars(&vars);
        assert_eq!(
            config.allow_origins,
            vec![
                "https://kxl.example".to_string(),
                "https://admin.kxl.example".to_string()
            ]
        );
        assert!(!config.allows_any());
    }
}
