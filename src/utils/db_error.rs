//! Helpers for classifying database errors.

/// Name of the unique index guarding `links.code`.
pub const LINK_CODE_CONSTRAINT: &str = "links_code_key";

/// Returns true when `e` is a unique violation on the short-code index.
///
/// This is the signal that a concurrent creator won the race for a code
/// between the existence check and the insert.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(LINK_CODE_CONSTRAINT)
}
