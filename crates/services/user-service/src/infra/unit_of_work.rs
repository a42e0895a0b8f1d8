//! Unit of Work pattern implementation.
//!
//! Groups repository calls that must succeed or fail together. The
//! transaction commits when the closure returns `Ok` and rolls back
//! otherwise.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};

use crate::repository::{CredentialRepository, CredentialStore, UserRepository, UserStore};
use common::{AppError, AppResult};

/// Boxed future returned by a transactional closure.
pub type TxFuture<T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable through `automock` because of the generic method; tests
/// build a [`TransactionContext`] over mock repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// User repository bound to the pool
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Credential repository bound to the pool
    fn credentials(&self) -> Arc<dyn CredentialRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(TransactionContext) -> TxFuture<T> + Send,
        T: Send + 'static;
}

/// Repository access scoped to one transaction.
///
/// Every call made through the context shares the same database
/// transaction.
pub struct TransactionContext {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

impl TransactionContext {
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self { users, credentials }
    }

    /// User repository for this transaction
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    /// Credential repository for this transaction
    pub fn credentials(&self) -> &dyn CredentialRepository {
        self.credentials.as_ref()
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    users: Arc<UserStore>,
    credentials: Arc<CredentialStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            credentials: Arc::new(CredentialStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: FnOnce(TransactionContext) -> TxFuture<T> + Send,
        T: Send + 'static,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;
        let txn = Arc::new(txn);

        let ctx = TransactionContext::new(
            Arc::new(UserStore::new(txn.clone())),
            Arc::new(CredentialStore::new(txn.clone())),
        );

        let outcome = f(ctx).await;

        // The context is consumed by now, so this is the last handle
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| AppError::internal("Transaction still referenced after closure returned"))?;

        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        self.credentials.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(TransactionContext) -> TxFuture<T> + Send,
        T: Send + 'static,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}

/// Run `$body` inside a transaction with `$ctx` bound to the context.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(move |$ctx| Box::pin(async move { $body })).await
    };
}
