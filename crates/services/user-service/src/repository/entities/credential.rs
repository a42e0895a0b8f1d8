//! Credential database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Credential, RoleBasedAuthority};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub credential_id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub role_based_authority: String,
    pub is_enabled: bool,
    pub is_account_non_expired: bool,
    pub is_account_non_locked: bool,
    pub is_credentials_non_expired: bool,
    /// Owning user (NULL = unlinked)
    #[sea_orm(unique)]
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Credential {
    fn from(model: Model) -> Self {
        Credential {
            credential_id: model.credential_id,
            username: model.username,
            password: model.password,
            role_based_authority: RoleBasedAuthority::from(model.role_based_authority.as_str()),
            is_enabled: model.is_enabled,
            is_account_non_expired: model.is_account_non_expired,
            is_account_non_locked: model.is_account_non_locked,
            is_credentials_non_expired: model.is_credentials_non_expired,
            user_id: model.user_id,
        }
    }
}
