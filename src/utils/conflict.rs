use kxl_core::AppError;
use kxl_db::DbError;

/// Maps a uniqueness violation to `40002` with `message`; anything else is
/// internal.
pub fn conflict_or_internal(message: &'static str) -> impl FnOnce(DbError) -> AppError {
    move |err| match err {
        DbError::Conflict(_) => AppError::conflict(message),
        other => AppError::internal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kxl_core::errors::codes;

    #[test]
    fn test_conflict_maps_to_40002() {
        let err = conflict_or_internal("conflict: username already exists")(DbError::Conflict(
            "admins_username_key".to_string(),
        ));
        assert!(err.is(codes::CONFLICT));
        assert_eq!(err.message, "conflict: username already exists");
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = conflict_or_internal("x")(DbError::Unavailable("down".to_string()));
        assert!(err.is(codes::INTERNAL));
    }
}
