pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when a write bounced off one of the schema's uniqueness
    /// constraints ((student, exam, attempt_number) or (submission, question)).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => {
                // Postgres SQLSTATE: 23505 unique_violation, 23503 foreign_key_violation.
                if let Some(db_err) = other.as_database_error() {
                    match db_err.code().as_deref() {
                        Some("23505") => {
                            return Error::Conflict(
                                db_err.constraint().unwrap_or("unique constraint").to_string(),
                            );
                        }
                        Some("23503") => {
                            return Error::ForeignKey(
                                db_err
                                    .constraint()
                                    .unwrap_or("foreign key constraint")
                                    .to_string(),
                            );
                        }
                        _ => {}
                    }
                }
                Error::Database(other)
            }
        }
    }
}
