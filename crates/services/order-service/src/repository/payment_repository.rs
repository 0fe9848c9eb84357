//! Payment repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use common::{AppError, AppResult};
use domain::{DomainError, Money, Payment, ReferenceKind};

use super::entities::payment::{self, Entity as PaymentEntity};

/// Transaction-bound access to payments.
pub struct TxPaymentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPaymentRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<Payment>> {
        let model = PaymentEntity::find_by_id(id).one(self.txn).await?;
        Ok(model.map(Payment::try_from).transpose()?)
    }

    /// Find a payment or fail with `NotFound`.
    pub async fn get(&self, id: i32) -> AppResult<Payment> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ReferenceKind::Payment, id).into())
    }

    pub async fn find_by_order(&self, order_id: i32) -> AppResult<Option<Payment>> {
        let model = PaymentEntity::find()
            .filter(payment::Column::ServiceOrderId.eq(order_id))
            .one(self.txn)
            .await?;
        Ok(model.map(Payment::try_from).transpose()?)
    }

    /// Insert the payment of an order.
    ///
    /// The unique index on `service_order_id` backs the one-payment rule; a
    /// violation surfaces as `AlreadyPaid`.
    pub async fn create(
        &self,
        order_id: i32,
        amount: Money,
        now: DateTime<Utc>,
    ) -> AppResult<Payment> {
        let active_model = payment::ActiveModel {
            service_order_id: Set(order_id),
            amount: Set(amount.amount()),
            paid_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(|e| payment_error(order_id, e))?;

        Ok(Payment::try_from(model)?)
    }
}

fn payment_error(order_id: i32, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyPaid(order_id).into(),
        _ => AppError::from(err),
    }
}
