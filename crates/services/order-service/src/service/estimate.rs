//! Estimate bookkeeping shared by the order and repair use cases.

use chrono::{DateTime, Utc};

use common::AppResult;
use domain::{estimate_of, AdditionalRepair, ServiceOrder, ServiceOrderDetails};

use crate::infra::TransactionContext;

/// Recompute the order estimate from its lines and approved repairs, then
/// store it.
pub(crate) async fn refresh_order_estimate(
    ctx: &TransactionContext<'_>,
    order: &mut ServiceOrder,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let services = ctx.orders().service_lines(order.id).await?;
    let parts = ctx.orders().part_lines(order.id).await?;
    let approved = ctx.repairs().approved_total(order.id).await?;

    order.estimate = estimate_of(&services, &parts)?.checked_add(approved)?;
    order.updated_at = now;
    ctx.orders().save(order).await
}

/// Recompute a repair's delta from its own lines, then store the header.
pub(crate) async fn refresh_repair_delta(
    ctx: &TransactionContext<'_>,
    repair: &mut AdditionalRepair,
    now: DateTime<Utc>,
) -> AppResult<()> {
    repair.estimate_delta = estimate_of(&repair.services, &repair.parts)?;
    repair.updated_at = now;
    ctx.repairs().save(repair).await
}

/// Load an order's lines and repairs alongside its header.
pub(crate) async fn load_details(
    ctx: &TransactionContext<'_>,
    order: ServiceOrder,
) -> AppResult<ServiceOrderDetails> {
    let services = ctx.orders().service_lines(order.id).await?;
    let parts = ctx.orders().part_lines(order.id).await?;
    let additional_repairs = ctx.repairs().for_order(order.id).await?;

    Ok(ServiceOrderDetails {
        order,
        services,
        parts,
        additional_repairs,
    })
}
