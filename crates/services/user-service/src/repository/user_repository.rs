//! User repository implementation.
//!
//! Every read joins the credential row that points back at the user, so the
//! returned `User` always reflects the current credential link.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, Unchanged,
};

use super::entities::{credential, to_domain, user, CredentialEntity, UserActiveModel, UserEntity};
use common::{AppError, AppResult};
use domain::{DomainError, User, UserFields};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Lookups return users regardless of whether a credential is linked;
/// filtering out incomplete registrations is a service concern.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, with its credential if one is linked
    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>>;

    /// List every user ordered by ID
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find the user linked to the credential with this username
    async fn find_by_credential_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, fields: UserFields) -> AppResult<User>;

    /// Overwrite every scalar column of an existing user.
    ///
    /// The credential link is untouched.
    async fn replace(&self, user_id: i32, fields: UserFields) -> AppResult<User>;

    /// Check whether a user row exists
    async fn exists_by_id(&self, user_id: i32) -> AppResult<bool>;

    /// Remove every user row
    async fn delete_all(&self) -> AppResult<u64>;
}

/// SeaORM-backed user repository.
///
/// Generic over the connection so the same queries run on the pool or
/// inside a transaction.
pub struct UserStore<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C> UserStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Create new repository instance
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C> UserRepository for UserStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(user_id)
            .find_also_related(CredentialEntity)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(user, credential)| to_domain(user, credential)))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = UserEntity::find()
            .find_also_related(CredentialEntity)
            .order_by_asc(user::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(user, credential)| to_domain(user, credential))
            .collect())
    }

    async fn find_by_credential_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .find_also_related(CredentialEntity)
            .filter(credential::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(user, credential)| to_domain(user, credential)))
    }

    async fn create(&self, fields: UserFields) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = UserActiveModel {
            user_id: NotSet,
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            image_url: Set(fields.image_url),
            email: Set(fields.email),
            phone: Set(fields.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(to_domain(model, None))
    }

    async fn replace(&self, user_id: i32, fields: UserFields) -> AppResult<User> {
        let active_model = UserActiveModel {
            user_id: Unchanged(user_id),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            image_url: Set(fields.image_url),
            email: Set(fields.email),
            phone: Set(fields.phone),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now()),
        };

        match active_model.update(self.db.as_ref()).await {
            Ok(_) => {}
            Err(DbErr::RecordNotUpdated) => {
                return Err(DomainError::user_not_found(user_id).into());
            }
            Err(e) => return Err(e.into()),
        }

        // Reload so the linked credential comes back with the row
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id).into())
    }

    async fn exists_by_id(&self, user_id: i32) -> AppResult<bool> {
        let count = UserEntity::find_by_id(user_id)
            .count(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = UserEntity::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
