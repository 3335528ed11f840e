//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an input is missing or malformed.
//! - [`KeyNotFound`] thrown when an item does not exist or is not visible to
//!   the caller. The two cases are deliberately indistinguishable.
//! - [`ExistingKey`] thrown when a unique key is already taken.
//! - [`InvalidCredentials`] thrown when a login does not match an account.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Maps a unique-constraint violation to [`EngineError::ExistingKey`],
    /// leaving every other database error untouched.
    pub(crate) fn on_unique_violation(message: &str) -> impl FnOnce(DbErr) -> Self + '_ {
        move |err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(message.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
