//! Payment closer - records the single payment that delivers an order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use common::AppResult;
use domain::{ensure_payable, Money, Payment, ServiceOrderStatus};

use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Payment use cases.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Pay a finalized order in full and move it to `DELIVERED`
    async fn record(&self, service_order_id: i32, amount: Money) -> AppResult<Payment>;

    async fn get(&self, id: i32) -> AppResult<Payment>;
}

/// Concrete implementation of PaymentService using Unit of Work.
pub struct PaymentCloser<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentCloser<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentCloser<U> {
    async fn record(&self, service_order_id: i32, amount: Money) -> AppResult<Payment> {
        let now = Utc::now();
        let payment = with_transaction!(serializable self.uow, |ctx| {
            record_tx(&ctx, service_order_id, amount, now).await
        })?;

        info!(
            order_id = service_order_id,
            payment_id = payment.id,
            amount = %payment.amount,
            status = %ServiceOrderStatus::Delivered,
            "payment recorded"
        );
        Ok(payment)
    }

    async fn get(&self, id: i32) -> AppResult<Payment> {
        with_transaction!(snapshot self.uow, |ctx| ctx.payments().get(id).await)
    }
}

async fn record_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    amount: Money,
    now: DateTime<Utc>,
) -> AppResult<Payment> {
    let mut order = ctx.orders().get(order_id).await?;
    let existing = ctx.payments().find_by_order(order.id).await?;
    ensure_payable(&order, existing.is_some(), amount)?;

    let payment = ctx.payments().create(order.id, amount, now).await?;
    order.apply_status(ServiceOrderStatus::Delivered, now)?;
    ctx.orders().save(&order).await?;
    Ok(payment)
}
