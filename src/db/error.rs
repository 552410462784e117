use thiserror::Error;

/// Postgres SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors produced by the SQL builders and repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The request could not be turned into a statement (e.g. empty update)
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The target row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A foreign key constraint rejected the statement
    #[error("referential error: {0}")]
    ReferentialError(String),

    /// Connectivity, syntax or any other store failure
    #[error("unexpected database error: {0}")]
    Unexpected(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return RepositoryError::ReferentialError(format!(
                    "referenced row does not exist (constraint {constraint})"
                ));
            }
        }
        RepositoryError::Unexpected(err)
    }
}
