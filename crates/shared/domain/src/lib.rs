//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Persistence and transport concerns live in the service crates.

pub mod constants;
pub mod credential;
pub mod error;
pub mod user;

pub use constants::*;
pub use credential::{Credential, NewCredential, RoleBasedAuthority};
pub use error::DomainError;
pub use user::{User, UserFields, UserPatch};
