//! Credential domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_USER};

/// Authority carried by a credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum RoleBasedAuthority {
    #[default]
    #[serde(rename = "ROLE_USER")]
    RoleUser,
    #[serde(rename = "ROLE_ADMIN")]
    RoleAdmin,
}

impl RoleBasedAuthority {
    /// Stored representation of the authority
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleBasedAuthority::RoleAdmin => ROLE_ADMIN,
            RoleBasedAuthority::RoleUser => ROLE_USER,
        }
    }
}

/// Unknown values fall back to `ROLE_USER`.
impl From<&str> for RoleBasedAuthority {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => RoleBasedAuthority::RoleAdmin,
            _ => RoleBasedAuthority::RoleUser,
        }
    }
}

impl From<String> for RoleBasedAuthority {
    fn from(s: String) -> Self {
        RoleBasedAuthority::from(s.as_str())
    }
}

impl std::fmt::Display for RoleBasedAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential domain entity.
///
/// The link to the owning user is held here as a plain id. A [`crate::User`]
/// sees its credential through a join, never through ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub credential_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role_based_authority: RoleBasedAuthority,
    pub is_enabled: bool,
    pub is_account_non_expired: bool,
    pub is_account_non_locked: bool,
    pub is_credentials_non_expired: bool,
    /// Owning user, `None` once unlinked
    pub user_id: Option<i32>,
}

/// Data required to create a credential row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    pub role_based_authority: RoleBasedAuthority,
    pub is_enabled: bool,
    pub is_account_non_expired: bool,
    pub is_account_non_locked: bool,
    pub is_credentials_non_expired: bool,
    pub user_id: Option<i32>,
}

impl NewCredential {
    /// Credential with every status flag set, linked to `user_id`.
    pub fn active(
        username: impl Into<String>,
        password: impl Into<String>,
        role_based_authority: RoleBasedAuthority,
        user_id: i32,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role_based_authority,
            is_enabled: true,
            is_account_non_expired: true,
            is_account_non_locked: true,
            is_credentials_non_expired: true,
            user_id: Some(user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_round_trips_through_stored_value() {
        assert_eq!(RoleBasedAuthority::from("ROLE_ADMIN"), RoleBasedAuthority::RoleAdmin);
        assert_eq!(RoleBasedAuthority::from("ROLE_USER"), RoleBasedAuthority::RoleUser);
        assert_eq!(RoleBasedAuthority::RoleAdmin.to_string(), "ROLE_ADMIN");
    }

    #[test]
    fn unknown_authority_defaults_to_user() {
        assert_eq!(RoleBasedAuthority::from("superuser"), RoleBasedAuthority::RoleUser);
    }

    #[test]
    fn active_credential_sets_all_flags() {
        let credential = NewCredential::active("testuser", "password123", RoleBasedAuthority::RoleUser, 7);

        assert!(credential.is_enabled);
        assert!(credential.is_account_non_expired);
        assert!(credential.is_account_non_locked);
        assert!(credential.is_credentials_non_expired);
        assert_eq!(credential.user_id, Some(7));
    }
}
