//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::Credential;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
    pub email: String,
    pub phone: String,
    /// Linked credential, loaded through the credential-side foreign key
    pub credential: Option<Credential>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user has a linked credential.
    ///
    /// A user without one is an incomplete registration: listings skip it
    /// and lookups report it as not found.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Id of the linked credential, if any
    pub fn credential_id(&self) -> Option<i32> {
        self.credential.as_ref().map(|c| c.credential_id)
    }

    /// Snapshot of the scalar columns
    pub fn fields(&self) -> UserFields {
        UserFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            image_url: self.image_url.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Every scalar column of a user.
///
/// Written as a whole on create and on full replace. Carries no credential,
/// so a user write never alters the credential link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
    pub email: String,
    pub phone: String,
}

/// Partial update of a user's scalar columns.
///
/// `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserPatch {
    /// Apply the patch on top of `current`.
    pub fn overlay(self, current: UserFields) -> UserFields {
        UserFields {
            first_name: self.first_name.unwrap_or(current.first_name),
            last_name: self.last_name.unwrap_or(current.last_name),
            image_url: self.image_url.or(current.image_url),
            email: self.email.unwrap_or(current.email),
            phone: self.phone.unwrap_or(current.phone),
        }
    }
}
