use core_repository::{FieldErrors, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidPassword(String),

    #[error(transparent)]
    Validation(#[from] FieldErrors),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Stable machine-readable error type, for callers rendering errors
    pub fn error_type(&self) -> &'static str {
        match self {
            UserError::NotFound(_) => "not_found",
            UserError::Conflict(_) => "duplicate",
            UserError::BadRequest(_) => "bad_request",
            UserError::InvalidCredentials => "invalid_credentials",
            UserError::InvalidPassword(_) => "invalid_password",
            UserError::Validation(_) => "validation_error",
            UserError::PasswordHash(_) => "internal_error",
        }
    }
}

impl From<RepositoryError> for UserError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => UserError::NotFound(msg),
            RepositoryError::Conflict(msg) => UserError::Conflict(msg),
        }
    }
}
