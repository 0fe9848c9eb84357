//! Service order manager - intake, composition and the status lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use common::{AppResult, Paginated, PaginationParams};
use domain::{
    DomainError, PartLine, PartRequest, ServiceLine, ServiceOrder, ServiceOrderDetails, ServiceOrderStatus,
};

use super::estimate::{load_details, refresh_order_estimate};
use crate::catalog::{active_service, ensure_customer, ensure_vehicle, release_stock, reserve_stock};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Service order use cases.
///
/// Every mutation returns the order as committed, with its lines and
/// additional repairs.
#[async_trait]
pub trait ServiceOrderService: Send + Sync {
    /// Open an order in `RECEIVED` for an active customer and vehicle
    async fn open(&self, customer_id: i32, vehicle_id: i32) -> AppResult<ServiceOrderDetails>;

    async fn get(&self, id: i32) -> AppResult<ServiceOrderDetails>;

    /// Page through order headers, newest first
    async fn list(
        &self,
        status: Option<ServiceOrderStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceOrder>>;

    /// Attach a catalog service at its current price
    async fn attach_service(&self, order_id: i32, service_id: i32) -> AppResult<ServiceOrderDetails>;

    async fn detach_service(&self, order_id: i32, line_id: i32) -> AppResult<ServiceOrderDetails>;

    /// Reserve and attach a quantity of a catalog part
    async fn attach_part(&self, order_id: i32, part: PartRequest) -> AppResult<ServiceOrderDetails>;

    /// Detach a part line, releasing its reservation
    async fn detach_part(&self, order_id: i32, line_id: i32) -> AppResult<ServiceOrderDetails>;

    /// RECEIVED → IN_DIAGNOSIS, attaching the given items on the way
    async fn start_diagnosis(
        &self,
        order_id: i32,
        service_ids: Vec<i32>,
        parts: Vec<PartRequest>,
    ) -> AppResult<ServiceOrderDetails>;

    /// IN_DIAGNOSIS → AWAITING_APPROVAL
    async fn submit_estimate(&self, order_id: i32) -> AppResult<ServiceOrderDetails>;

    /// AWAITING_APPROVAL → IN_EXECUTION
    async fn start_execution(&self, order_id: i32) -> AppResult<ServiceOrderDetails>;

    /// IN_EXECUTION → FINALIZED, refused while repairs are undecided
    async fn finalize(&self, order_id: i32) -> AppResult<ServiceOrderDetails>;

    /// → CANCELLED before execution, releasing every reservation
    async fn cancel(&self, order_id: i32) -> AppResult<ServiceOrderDetails>;
}

/// Concrete implementation of ServiceOrderService using Unit of Work.
pub struct ServiceOrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ServiceOrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn advance(&self, order_id: i32, target: ServiceOrderStatus) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            advance_tx(&ctx, order_id, target, now).await
        })?;

        info!(
            order_id,
            status = %details.order.status,
            estimate = %details.order.estimate,
            "service order status updated"
        );
        Ok(details)
    }
}

#[async_trait]
impl<U: UnitOfWork> ServiceOrderService for ServiceOrderManager<U> {
    async fn open(&self, customer_id: i32, vehicle_id: i32) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            open_tx(&ctx, customer_id, vehicle_id, now).await
        })?;

        info!(
            order_id = details.order.id,
            customer_id,
            vehicle_id,
            status = %details.order.status,
            "service order opened"
        );
        Ok(details)
    }

    async fn get(&self, id: i32) -> AppResult<ServiceOrderDetails> {
        with_transaction!(snapshot self.uow, |ctx| {
            let order = ctx.orders().get(id).await?;
            load_details(&ctx, order).await
        })
    }

    async fn list(
        &self,
        status: Option<ServiceOrderStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceOrder>> {
        let (orders, total) = with_transaction!(snapshot self.uow, |ctx| {
            ctx.orders().list(status, params).await
        })?;

        Ok(Paginated::new(orders, params, total))
    }

    async fn attach_service(&self, order_id: i32, service_id: i32) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            attach_service_tx(&ctx, order_id, service_id, now).await
        })?;

        info!(
            order_id,
            service_id,
            estimate = %details.order.estimate,
            "service attached to order"
        );
        Ok(details)
    }

    async fn detach_service(&self, order_id: i32, line_id: i32) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            detach_service_tx(&ctx, order_id, line_id, now).await
        })?;

        info!(
            order_id,
            line_id,
            estimate = %details.order.estimate,
            "service detached from order"
        );
        Ok(details)
    }

    async fn attach_part(&self, order_id: i32, part: PartRequest) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            attach_part_tx(&ctx, order_id, part, now).await
        })?;

        info!(
            order_id,
            part_id = part.part_id,
            quantity = part.quantity,
            estimate = %details.order.estimate,
            "part attached to order"
        );
        Ok(details)
    }

    async fn detach_part(&self, order_id: i32, line_id: i32) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            detach_part_tx(&ctx, order_id, line_id, now).await
        })?;

        info!(
            order_id,
            line_id,
            estimate = %details.order.estimate,
            "part detached from order"
        );
        Ok(details)
    }

    async fn start_diagnosis(
        &self,
        order_id: i32,
        service_ids: Vec<i32>,
        parts: Vec<PartRequest>,
    ) -> AppResult<ServiceOrderDetails> {
        let now = Utc::now();
        let details = with_transaction!(serializable self.uow, |ctx| {
            start_diagnosis_tx(&ctx, order_id, service_ids, parts, now).await
        })?;

        info!(
            order_id,
            status = %details.order.status,
            estimate = %details.order.estimate,
            "service order diagnosis started"
        );
        Ok(details)
    }

    async fn submit_estimate(&self, order_id: i32) -> AppResult<ServiceOrderDetails> {
        self.advance(order_id, ServiceOrderStatus::AwaitingApproval).await
    }

    async fn start_execution(&self, order_id: i32) -> AppResult<ServiceOrderDetails> {
        self.advance(order_id, ServiceOrderStatus::InExecution).await
    }

    async fn finalize(&self, order_id: i32) -> AppResult<ServiceOrderDetails> {
        self.advance(order_id, ServiceOrderStatus::Finalized).await
    }

    async fn cancel(&self, order_id: i32) -> AppResult<ServiceOrderDetails> {
        self.advance(order_id, ServiceOrderStatus::Cancelled).await
    }
}

async fn open_tx(
    ctx: &TransactionContext<'_>,
    customer_id: i32,
    vehicle_id: i32,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let catalog = ctx.catalog();
    ensure_customer(&catalog, customer_id).await?;
    ensure_vehicle(&catalog, vehicle_id).await?;

    let order = ctx.orders().create(customer_id, vehicle_id, now).await?;
    load_details(ctx, order).await
}

async fn attach_service_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    service_id: i32,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    add_service_line(ctx, &order, service_id).await?;
    refresh_order_estimate(ctx, &mut order, now).await?;
    load_details(ctx, order).await
}

async fn attach_part_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    request: PartRequest,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    add_part_line(ctx, &order, request).await?;
    refresh_order_estimate(ctx, &mut order, now).await?;
    load_details(ctx, order).await
}

async fn detach_service_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    line_id: i32,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    order.ensure_editable("detach a service")?;

    ctx.orders().remove_service_line(order.id, line_id).await?;
    refresh_order_estimate(ctx, &mut order, now).await?;
    load_details(ctx, order).await
}

async fn detach_part_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    line_id: i32,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    order.ensure_editable("detach a part")?;

    let line = ctx.orders().remove_part_line(order.id, line_id).await?;
    release_stock(&ctx.catalog(), &[PartRequest { part_id: line.part_id, quantity: line.quantity }])
        .await?;
    refresh_order_estimate(ctx, &mut order, now).await?;
    load_details(ctx, order).await
}

async fn start_diagnosis_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    service_ids: Vec<i32>,
    parts: Vec<PartRequest>,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    let transition = order.status.transition(ServiceOrderStatus::InDiagnosis)?;
    if !transition.is_advanced() {
        return load_details(ctx, order).await;
    }

    for service_id in service_ids {
        add_service_line(ctx, &order, service_id).await?;
    }
    for request in parts {
        add_part_line(ctx, &order, request).await?;
    }

    order.apply_status(ServiceOrderStatus::InDiagnosis, now)?;
    refresh_order_estimate(ctx, &mut order, now).await?;
    load_details(ctx, order).await
}

async fn advance_tx(
    ctx: &TransactionContext<'_>,
    order_id: i32,
    target: ServiceOrderStatus,
    now: DateTime<Utc>,
) -> AppResult<ServiceOrderDetails> {
    let mut order = ctx.orders().get(order_id).await?;
    let transition = order.apply_status(target, now)?;

    if transition.is_advanced() {
        match target {
            ServiceOrderStatus::Finalized => ensure_repairs_decided(ctx, &order).await?,
            ServiceOrderStatus::Cancelled => release_order_stock(ctx, &order).await?,
            _ => {}
        }
        ctx.orders().save(&order).await?;
    }

    load_details(ctx, order).await
}

async fn add_service_line(
    ctx: &TransactionContext<'_>,
    order: &ServiceOrder,
    service_id: i32,
) -> AppResult<ServiceLine> {
    order.ensure_editable("attach a service")?;

    let service = active_service(&ctx.catalog(), service_id).await?;
    ctx.orders()
        .add_service_line(order.id, service.id, service.price)
        .await
}

async fn add_part_line(
    ctx: &TransactionContext<'_>,
    order: &ServiceOrder,
    request: PartRequest,
) -> AppResult<PartLine> {
    order.ensure_editable("attach a part")?;

    let part = reserve_stock(&ctx.catalog(), request).await?;
    ctx.orders()
        .add_part_line(order.id, part.id, request.quantity, part.price)
        .await
}

async fn ensure_repairs_decided(ctx: &TransactionContext<'_>, order: &ServiceOrder) -> AppResult<()> {
    let pending = ctx
        .repairs()
        .for_order(order.id)
        .await?
        .iter()
        .filter(|r| !r.status.is_decided())
        .count();

    if pending > 0 {
        return Err(DomainError::PendingAdditionalRepairs {
            order_id: order.id,
            count: pending,
        }
        .into());
    }
    Ok(())
}

/// Give back the stock held by the order's part lines and by its repairs.
/// Rejected repairs hold nothing, their lines are already gone.
async fn release_order_stock(ctx: &TransactionContext<'_>, order: &ServiceOrder) -> AppResult<()> {
    let mut released: Vec<PartRequest> = ctx
        .orders()
        .part_lines(order.id)
        .await?
        .iter()
        .map(|line| PartRequest { part_id: line.part_id, quantity: line.quantity })
        .collect();

    for repair in ctx.repairs().for_order(order.id).await? {
        released.extend(
            repair
                .parts
                .iter()
                .map(|line| PartRequest { part_id: line.part_id, quantity: line.quantity }),
        );
    }

    release_stock(&ctx.catalog(), &released).await
}
