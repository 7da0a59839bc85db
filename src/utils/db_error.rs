//! Helpers for classifying database errors.

/// Unique constraint guarding the token column.
pub const TOKEN_UNIQUE_CONSTRAINT: &str = "short_links_token_key";

/// Returns the violated constraint name if `e` is a unique violation.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    Some(db_err.constraint().unwrap_or_default().to_string())
}

/// Returns true if `e` is a unique violation on the token column.
pub fn is_unique_violation_on_token(e: &sqlx::Error) -> bool {
    unique_violation_constraint(e).is_some_and(|c| c == TOKEN_UNIQUE_CONSTRAINT)
}
