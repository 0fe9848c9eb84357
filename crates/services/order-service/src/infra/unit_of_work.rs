//! Unit of Work pattern implementation.
//!
//! Every core operation runs inside exactly one database transaction. The
//! closure handed to the unit of work receives a [`TransactionContext`] that
//! gives out repositories bound to that transaction; the transaction commits
//! only when the closure returns `Ok` and rolls back otherwise. A future that
//! is dropped mid-flight drops its transaction, which also rolls back.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};

use common::{AppError, AppResult};

use crate::repository::{TxCatalog, TxOrderRepository, TxPaymentRepository, TxRepairRepository};

/// Boxed future returned by transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, run the services against an in-memory database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Execute a closure within a transaction with serializable isolation.
    ///
    /// All state-changing operations of the order engine use this level.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a read-only closure against one consistent snapshot.
    async fn read_snapshot<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'a> {
        TxOrderRepository::new(self.txn)
    }

    pub fn repairs(&self) -> TxRepairRepository<'a> {
        TxRepairRepository::new(self.txn)
    }

    pub fn payments(&self) -> TxPaymentRepository<'a> {
        TxPaymentRepository::new(self.txn)
    }

    /// Catalog gateway whose reservations join this transaction
    pub fn catalog(&self) -> TxCatalog<'a> {
        TxCatalog::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn execute_transaction<F, T>(
        &self,
        isolation: IsolationLevel,
        access: AccessMode,
        f: F,
    ) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(access))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
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
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, AccessMode::ReadWrite, f)
            .await
    }

    async fn read_snapshot<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::RepeatableRead, AccessMode::ReadOnly, f)
            .await
    }
}

/// Simpler API for executing transactional operations.
///
/// ```ignore
/// let order = with_transaction!(serializable self.uow, |ctx| open(&ctx, 1, 2).await)?;
/// let order = with_transaction!(snapshot self.uow, |ctx| load(&ctx, 7).await)?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    (serializable $uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction_serializable(|$ctx| Box::pin(async move { $body }))
            .await
    };
    (snapshot $uow:expr, |$ctx:ident| $body:expr) => {
        $uow.read_snapshot(|$ctx| Box::pin(async move { $body })).await
    };
}
