//! Domain-level errors.
//!
//! Independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Errors raised by user and credential lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity not found; the message names the lookup key
    #[error("{0}")]
    NotFound(String),
}

impl DomainError {
    /// No visible user has this id
    pub fn user_not_found(user_id: i32) -> Self {
        DomainError::NotFound(format!("User with id: {} not found", user_id))
    }

    /// No user is linked to a credential with this username
    pub fn username_not_found(username: &str) -> Self {
        DomainError::NotFound(format!("User with username: {} not found", username))
    }

    /// No credential has this id
    pub fn credential_not_found(credential_id: i32) -> Self {
        DomainError::NotFound(format!("Credential with id: {} not found", credential_id))
    }
}
