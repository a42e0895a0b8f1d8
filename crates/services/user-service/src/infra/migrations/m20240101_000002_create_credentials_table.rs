//! Migration: Create credentials table.
//!
//! The credential owns the link: `user_id` is nullable and unique, and is
//! cleared when the user row goes away.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credentials::CredentialId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Credentials::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Credentials::Password).string().not_null())
                    .col(
                        ColumnDef::new(Credentials::RoleBasedAuthority)
                            .string()
                            .not_null()
                            .default("ROLE_USER"),
                    )
                    .col(
                        ColumnDef::new(Credentials::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Credentials::IsAccountNonExpired)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Credentials::IsAccountNonLocked)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Credentials::IsCredentialsNonExpired)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Credentials::UserId)
                            .integer()
                            .null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credentials_user_id")
                            .from(Credentials::Table, Credentials::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Credentials {
    Table,
    CredentialId,
    Username,
    Password,
    RoleBasedAuthority,
    IsEnabled,
    IsAccountNonExpired,
    IsAccountNonLocked,
    IsCredentialsNonExpired,
    UserId,
}
