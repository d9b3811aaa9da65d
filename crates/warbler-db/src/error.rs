use rusqlite::ErrorCode;

/// Uniqueness and foreign-key violations get their own variant so callers
/// can tell "username already taken" apart from a broken database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("constraint violation")]
    Constraint(#[source] rusqlite::Error),

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl DbError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, DbError::Constraint(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                DbError::Constraint(err)
            }
            _ => DbError::Sqlite(err),
        }
    }
}
