//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod credential;
pub mod user;

pub use credential::{ActiveModel as CredentialActiveModel, Entity as CredentialEntity, Model as CredentialModel};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};

use domain::User;

/// Assemble a domain user from its row and the credential joined onto it.
pub fn to_domain(user: UserModel, credential: Option<CredentialModel>) -> User {
    User {
        user_id: user.user_id,
        first_name: user.first_name,
        last_name: user.last_name,
        image_url: user.image_url,
        email: user.email,
        phone: user.phone,
        credential: credential.map(Into::into),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}
