//! Key layouts.
//!
//! Keys are plain strings so they stay readable in `redis-cli`. User input
//! never appears verbatim; login identifiers go through
//! [`identifier_fragment`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Session keys: `{prefix}{kind}:{token}`.
pub mod sessions {
    pub fn user(prefix: &str, token: &str) -> String {
        format!("{prefix}user:{token}")
    }

    pub fn admin(prefix: &str, token: &str) -> String {
        format!("{prefix}admin:{token}")
    }
}

/// Role permission cache keys.
pub mod rbac {
    pub fn role_permissions(role: &str) -> String {
        format!("rbac:role_permissions:{role}")
    }
}

/// Fixed-window counter keys.
pub mod rate_limit {
    use super::identifier_fragment;

    /// `rl:login:{actor}:{ip}:{b64(identifier)}`
    pub fn login(actor: &str, ip: &str, identifier: &str) -> String {
        format!(
            "rl:login:{actor}:{ip}:{}",
            identifier_fragment(identifier)
        )
    }

    /// `rl:upload:{actor}:{subject}:{kind}`
    pub fn upload(actor: &str, subject: &str, kind: &str) -> String {
        format!("rl:upload:{actor}:{subject}:{kind}")
    }
}

/// URL-safe, unpadded base64 of `identifier`: reversible for debugging, but
/// free of `:` and whitespace.
pub fn identifier_fragment(identifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(identifier.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys() {
        assert_eq!(sessions::user("kxl_session:", "abc"), "kxl_session:user:abc");
        assert_eq!(sessions::admin("kxl_session:", "abc"), "kxl_session:admin:abc");
    }

    #[test]
    fn test_rbac_key() {
        assert_eq!(rbac::role_permissions("editor"), "rbac:role_permissions:editor");
    }

    #[test]
    fn test_identifier_fragment_is_url_safe() {
        // "??>" encodes to "Pz8-" in URL-safe base64 ("Pz8+" in the standard alphabet).
        assert_eq!(identifier_fragment("??>"), "Pz8-");
        assert_eq!(identifier_fragment("a"), "YQ");
        assert!(!identifier_fragment("alice@example.com:x y").contains([':', ' ', '=']));
    }

    #[test]
    fn test_rate_limit_keys() {
        assert_eq!(
            rate_limit::login("user", "10.0.0.1", "a"),
            "rl:login:user:10.0.0.1:YQ"
        );
        assert_eq!(
            rate_limit::upload("admin", "42", "image"),
            "rl:upload:admin:42:image"
        );
    }
}
