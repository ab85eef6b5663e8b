use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|_| AppError::internal_message("password hash error"))
}

/// Returns `false` for a malformed hash instead of failing the request.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_cost("correct horse", 4).unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_verify_invalid_hash() {
        assert!(!verify_password("anything", "not_a_valid_bcrypt_hash"));
    }

    #[test]
    fn test_invalid_cost_is_internal() {
        let err = hash_password_with_cost("pw", 2).unwrap_err();
        assert_eq!(err.message, "password hash error");
    }
}
