//! Repository layer for data access.

mod credential_repository;
pub mod entities;
mod user_repository;

pub use credential_repository::{CredentialRepository, CredentialStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
