//! Credential repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, Set, Unchanged,
};

use super::entities::{CredentialActiveModel, CredentialEntity};
use common::{AppError, AppResult};
use domain::{Credential, DomainError, NewCredential};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Find credential by ID
    async fn find_by_id(&self, credential_id: i32) -> AppResult<Option<Credential>>;

    /// Insert a new credential
    async fn save(&self, credential: NewCredential) -> AppResult<Credential>;

    /// Clear the credential's link to its user
    async fn unlink(&self, credential_id: i32) -> AppResult<()>;

    /// Delete credential by ID
    async fn delete_by_credential_id(&self, credential_id: i32) -> AppResult<()>;

    /// Check whether a credential row exists
    async fn exists_by_id(&self, credential_id: i32) -> AppResult<bool>;

    /// Remove every credential row
    async fn delete_all(&self) -> AppResult<u64>;
}

/// SeaORM-backed credential repository
pub struct CredentialStore<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C> CredentialStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Create new repository instance
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C> CredentialRepository for CredentialStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, credential_id: i32) -> AppResult<Option<Credential>> {
        let result = CredentialEntity::find_by_id(credential_id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Credential::from))
    }

    async fn save(&self, credential: NewCredential) -> AppResult<Credential> {
        let active_model = CredentialActiveModel {
            credential_id: NotSet,
            username: Set(credential.username),
            password: Set(credential.password),
            role_based_authority: Set(credential.role_based_authority.as_str().to_string()),
            is_enabled: Set(credential.is_enabled),
            is_account_non_expired: Set(credential.is_account_non_expired),
            is_account_non_locked: Set(credential.is_account_non_locked),
            is_credentials_non_expired: Set(credential.is_credentials_non_expired),
            user_id: Set(credential.user_id),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(Credential::from(model))
    }

    async fn unlink(&self, credential_id: i32) -> AppResult<()> {
        let active_model = CredentialActiveModel {
            credential_id: Unchanged(credential_id),
            user_id: Set(None),
            ..Default::default()
        };

        match active_model.update(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::credential_not_found(credential_id).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_by_credential_id(&self, credential_id: i32) -> AppResult<()> {
        let result = CredentialEntity::delete_by_id(credential_id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(DomainError::credential_not_found(credential_id).into());
        }

        Ok(())
    }

    async fn exists_by_id(&self, credential_id: i32) -> AppResult<bool> {
        let count = CredentialEntity::find_by_id(credential_id)
            .count(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = CredentialEntity::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
