use std::str::FromStr;

/// Variable lookup; `std::env::var` in production, a map in tests.
pub(crate) type Vars<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn process_vars(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Non-empty, trimmed value of `key`.
pub(crate) fn string(vars: Vars<'_>, key: &str) -> Option<String> {
    vars(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn string_or(vars: Vars<'_>, key: &str, default: &str) -> String {
    string(vars, key).unwrap_or_else(|| default.to_string())
}

pub(crate) fn parse<T: FromStr>(vars: Vars<'_>, key: &str) -> Option<T> {
    string(vars, key).and_then(|v| v.parse().ok())
}

/// Parsed value of `key` when strictly positive, otherwise `default`.
pub(crate) fn positive_or(vars: Vars<'_>, key: &str, default: u64) -> u64 {
    parse::<i64>(vars, key)
        .filter(|v| *v > 0)
        .map(|v| v as u64)
        .unwrap_or(default)
}

/// `true`, `1` and `yes` (any case) are truthy; anything else set is falsy.
pub(crate) fn flag_or(vars: Vars<'_>, key: &str, default: bool) -> bool {
    match string(vars, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}


#[cfg(test)]
mod tests {
    use super::test_vars::from_pairs;
    use super::*;

    #[test]
    fn test_positive_or() {
        let vars = from_pairs(&[("A", "15"), ("B", "0"), ("C", "-3"), ("D", "x")]);
        assert_eq!(positive_or(&vars, "A", 60), 15);
        assert_eq!(positive_or(&vars, "B", 60), 60);
        assert_eq!(positive_or(&vars, "C", 60), 60);
        assert_eq!(positive_or(&vars, "D", 60), 60);
        assert_eq!(positive_or(&vars, "MISSING", 60), 60);
    }

    #[test]
    fn test_flag_or() {
        let vars = from_pairs(&[("A", "YES"), ("B", "1"), ("C", "off"), ("D", " ")]);
        assert!(flag_or(&vars, "A", false));
        assert!(flag_or(&vars, "B", false));
        assert!(!flag_or(&vars, "C", true));
        assert!(flag_or(&vars, "D", true));
    }
}
