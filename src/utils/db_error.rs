//! Classification of PostgreSQL constraint violations.

use crate::error::UniqueField;

/// Constraint guarding one record per short code.
pub const CODE_CONSTRAINT: &str = "urls_pkey";

/// Constraint guarding one record per long URL.
pub const LONG_URL_CONSTRAINT: &str = "urls_long_url_key";

/// Returns which uniqueness constraint a database error violated, if any.
///
/// Unknown unique constraints on the `urls` table are reported as code
/// collisions, since a fresh code is the only thing the engine can vary.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<UniqueField> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    if db_err.constraint() == Some(LONG_URL_CONSTRAINT) {
        Some(UniqueField::LongUrl)
    } else {
        Some(UniqueField::Code)
    }
}
