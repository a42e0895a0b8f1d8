//! User service - Handles user-related business logic.
//!
//! Only provisioned users (those with a linked credential) are visible to
//! reads and deletes. Updates act on any stored user.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::{DomainError, User, UserFields, UserPatch};

use crate::dto::UserDto;
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// List every provisioned user ordered by ID
    async fn find_all(&self) -> AppResult<Vec<UserDto>>;

    /// Get a provisioned user by ID
    async fn find_by_id(&self, user_id: i32) -> AppResult<UserDto>;

    /// Get the user linked to the credential with this username
    async fn find_by_username(&self, username: &str) -> AppResult<UserDto>;

    /// Create a user from the DTO's scalar fields
    async fn save(&self, user_dto: UserDto) -> AppResult<UserDto>;

    /// Replace every scalar field of the user named by `user_dto.user_id`
    async fn update(&self, user_dto: UserDto) -> AppResult<UserDto>;

    /// Apply a partial update to the user with this ID
    async fn update_by_id(&self, user_id: i32, patch: UserPatch) -> AppResult<UserDto>;

    /// Unlink and delete the user's credential; the user row stays
    async fn delete_by_id(&self, user_id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Keep only users that own a credential.
fn provisioned(user: Option<User>) -> Option<User> {
    user.filter(User::has_credential)
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn find_all(&self) -> AppResult<Vec<UserDto>> {
        tracing::info!("Fetching all users");

        let users = self.uow.users().find_all().await?;

        Ok(users
            .into_iter()
            .filter(User::has_credential)
            .map(UserDto::from)
            .collect())
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<UserDto> {
        tracing::info!(user_id, "Fetching user by id");

        provisioned(self.uow.users().find_by_id(user_id).await?)
            .map(UserDto::from)
            .ok_or_else(|| DomainError::user_not_found(user_id).into())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<UserDto> {
        tracing::info!(username, "Fetching user by username");

        provisioned(self.uow.users().find_by_credential_username(username).await?)
            .map(UserDto::from)
            .ok_or_else(|| DomainError::username_not_found(username).into())
    }

    async fn save(&self, user_dto: UserDto) -> AppResult<UserDto> {
        tracing::info!("Saving user");

        let user = self.uow.users().create(UserFields::from(user_dto)).await?;
        tracing::debug!(user_id = user.user_id, "User created");

        Ok(UserDto::from(user))
    }

    async fn update(&self, user_dto: UserDto) -> AppResult<UserDto> {
        let user_id = user_dto
            .user_id
            .ok_or_else(|| AppError::validation("userId is required"))?;
        tracing::info!(user_id, "Updating user");

        let fields = UserFields::from(user_dto);
        let user = with_transaction!(self.uow, |ctx| {
            if ctx.users().find_by_id(user_id).await?.is_none() {
                return Err(AppError::from(DomainError::user_not_found(user_id)));
            }
            ctx.users().replace(user_id, fields).await
        })?;

        Ok(UserDto::from(user))
    }

    async fn update_by_id(&self, user_id: i32, patch: UserPatch) -> AppResult<UserDto> {
        tracing::info!(user_id, "Updating user by id");

        let user = with_transaction!(self.uow, |ctx| {
            let current = ctx
                .users()
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AppError::from(DomainError::user_not_found(user_id)))?;

            ctx.users().replace(user_id, patch.overlay(current.fields())).await
        })?;

        Ok(UserDto::from(user))
    }

    async fn delete_by_id(&self, user_id: i32) -> AppResult<()> {
        tracing::info!(user_id, "Deleting user by id");

        with_transaction!(self.uow, |ctx| {
            let credential_id = provisioned(ctx.users().find_by_id(user_id).await?)
                .and_then(|user| user.credential_id())
                .ok_or_else(|| AppError::from(DomainError::user_not_found(user_id)))?;

            ctx.credentials().unlink(credential_id).await?;
            ctx.credentials().delete_by_credential_id(credential_id).await?;
            tracing::debug!(user_id, credential_id, "Credential unlinked and deleted");

            Ok::<(), AppError>(())
        })
    }
}
