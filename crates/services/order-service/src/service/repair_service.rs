//! Additional repair coordinator - the approval sub-protocol.
//!
//! Repairs hold their own lines and reservations. Only an approved repair
//! contributes its delta to the order estimate; a rejected one gives its
//! stock back and drops its lines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use common::AppResult;
use domain::{
    normalize_description, plan_removal, AdditionalRepair, DomainError, Money, PartRequest,
    RepairDecision, RepairItems, RepairStatus,
};

use super::estimate::{refresh_order_estimate, refresh_repair_delta};
use crate::catalog::{active_service, release_stock, reserve_stock};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Input of [`AdditionalRepairService::create`].
#[derive(Debug, Clone, Default)]
pub struct NewAdditionalRepair {
    pub service_order_id: i32,
    pub description: String,
    pub service_ids: Vec<i32>,
    pub parts: Vec<PartRequest>,
}

/// Additional repair use cases.
#[async_trait]
pub trait AdditionalRepairService: Send + Sync {
    /// Create a repair in `IN_ANALYSIS`, reserving its parts
    async fn create(&self, repair: NewAdditionalRepair) -> AppResult<AdditionalRepair>;

    async fn get(&self, id: i32) -> AppResult<AdditionalRepair>;

    /// Remove then add items while the repair is `IN_ANALYSIS`.
    ///
    /// Adding a service the repair already holds is a no-op; adding a part it
    /// already holds raises that line's quantity.
    async fn modify_items(
        &self,
        id: i32,
        add: RepairItems,
        remove: RepairItems,
    ) -> AppResult<AdditionalRepair>;

    /// IN_ANALYSIS → AWAITING_APPROVAL
    async fn submit(&self, id: i32) -> AppResult<AdditionalRepair>;

    /// AWAITING_APPROVAL → APPROVED | REJECTED
    async fn decide(&self, id: i32, decision: RepairDecision) -> AppResult<AdditionalRepair>;
}

/// Concrete implementation of AdditionalRepairService using Unit of Work.
pub struct AdditionalRepairCoordinator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AdditionalRepairCoordinator<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AdditionalRepairService for AdditionalRepairCoordinator<U> {
    async fn create(&self, repair: NewAdditionalRepair) -> AppResult<AdditionalRepair> {
        let now = Utc::now();
        let repair = with_transaction!(serializable self.uow, |ctx| {
            create_tx(&ctx, repair, now).await
        })?;

        info!(
            order_id = repair.service_order_id,
            repair_id = repair.id,
            status = %repair.status,
            estimate_delta = %repair.estimate_delta,
            "additional repair created"
        );
        Ok(repair)
    }

    async fn get(&self, id: i32) -> AppResult<AdditionalRepair> {
        with_transaction!(snapshot self.uow, |ctx| ctx.repairs().get(id).await)
    }

    async fn modify_items(
        &self,
        id: i32,
        add: RepairItems,
        remove: RepairItems,
    ) -> AppResult<AdditionalRepair> {
        let now = Utc::now();
        let repair = with_transaction!(serializable self.uow, |ctx| {
            modify_items_tx(&ctx, id, add, remove, now).await
        })?;

        info!(
            order_id = repair.service_order_id,
            repair_id = repair.id,
            estimate_delta = %repair.estimate_delta,
            "additional repair items updated"
        );
        Ok(repair)
    }

    async fn submit(&self, id: i32) -> AppResult<AdditionalRepair> {
        let now = Utc::now();
        let repair = with_transaction!(serializable self.uow, |ctx| {
            submit_tx(&ctx, id, now).await
        })?;

        info!(
            order_id = repair.service_order_id,
            repair_id = repair.id,
            status = %repair.status,
            "additional repair submitted for approval"
        );
        Ok(repair)
    }

    async fn decide(&self, id: i32, decision: RepairDecision) -> AppResult<AdditionalRepair> {
        let now = Utc::now();
        let (repair, estimate) = with_transaction!(serializable self.uow, |ctx| {
            decide_tx(&ctx, id, decision, now).await
        })?;

        info!(
            order_id = repair.service_order_id,
            repair_id = repair.id,
            status = %repair.status,
            estimate = %estimate,
            "additional repair decided"
        );
        Ok(repair)
    }
}

async fn create_tx(
    ctx: &TransactionContext<'_>,
    new: NewAdditionalRepair,
    now: DateTime<Utc>,
) -> AppResult<AdditionalRepair> {
    let order = ctx.orders().get(new.service_order_id).await?;
    order.ensure_accepts_repairs("create an additional repair")?;

    let description = normalize_description(&new.description)?;
    let items = RepairItems {
        service_ids: new.service_ids,
        parts: new.parts,
    }
    .normalized()?;

    let mut repair = ctx.repairs().create(order.id, &description, now).await?;
    add_items(ctx, &mut repair, &items).await?;
    refresh_repair_delta(ctx, &mut repair, now).await?;
    Ok(repair)
}

async fn modify_items_tx(
    ctx: &TransactionContext<'_>,
    id: i32,
    add: RepairItems,
    remove: RepairItems,
    now: DateTime<Utc>,
) -> AppResult<AdditionalRepair> {
    let mut repair = open_repair(ctx, id, "modify items").await?;
    repair.ensure_status(RepairStatus::InAnalysis, "modify items")?;

    let add = add.normalized()?;
    let remove = remove.normalized()?;
    if add.is_empty() && remove.is_empty() {
        return Err(DomainError::validation("no items to add or remove").into());
    }

    if !remove.is_empty() {
        let removal = plan_removal(&repair.services, &repair.parts, &remove)?;
        let repairs = ctx.repairs();

        repairs.delete_service_lines(&removal.service_line_ids).await?;
        repairs.delete_part_lines(&removal.deleted_part_lines).await?;
        for (line_id, quantity) in &removal.reduced_part_lines {
            if let Some(line) = repair.parts.iter_mut().find(|l| l.id == *line_id) {
                line.quantity = *quantity;
                repairs.update_part_line(line).await?;
            }
        }
        release_stock(&ctx.catalog(), &removal.released).await?;

        repair.services.retain(|l| !removal.service_line_ids.contains(&l.id));
        repair.parts.retain(|l| !removal.deleted_part_lines.contains(&l.id));
    }

    add_items(ctx, &mut repair, &add).await?;
    refresh_repair_delta(ctx, &mut repair, now).await?;
    Ok(repair)
}

async fn submit_tx(
    ctx: &TransactionContext<'_>,
    id: i32,
    now: DateTime<Utc>,
) -> AppResult<AdditionalRepair> {
    let mut repair = open_repair(ctx, id, "submit an additional repair").await?;
    if repair.apply_status(RepairStatus::AwaitingApproval, now)?.is_advanced() {
        ctx.repairs().save(&repair).await?;
    }
    Ok(repair)
}

async fn decide_tx(
    ctx: &TransactionContext<'_>,
    id: i32,
    decision: RepairDecision,
    now: DateTime<Utc>,
) -> AppResult<(AdditionalRepair, Money)> {
    let mut repair = open_repair(ctx, id, "decide an additional repair").await?;
    let mut order = ctx.orders().get(repair.service_order_id).await?;

    if !repair.apply_status(decision.into(), now)?.is_advanced() {
        return Ok((repair, order.estimate));
    }

    if decision == RepairDecision::Rejected {
        let held: Vec<PartRequest> = repair
            .parts
            .iter()
            .map(|line| PartRequest { part_id: line.part_id, quantity: line.quantity })
            .collect();
        release_stock(&ctx.catalog(), &held).await?;
        ctx.repairs().clear_lines(repair.id).await?;

        repair.services.clear();
        repair.parts.clear();
        repair.estimate_delta = Money::ZERO;
    }

    ctx.repairs().save(&repair).await?;
    // A rejected repair never counted, so only approval moves the estimate.
    if decision == RepairDecision::Approved {
        refresh_order_estimate(ctx, &mut order, now).await?;
    }
    Ok((repair, order.estimate))
}

/// Load a repair whose order still accepts repair work.
async fn open_repair(
    ctx: &TransactionContext<'_>,
    id: i32,
    operation: &'static str,
) -> AppResult<AdditionalRepair> {
    let repair = ctx.repairs().get(id).await?;
    let order = ctx.orders().get(repair.service_order_id).await?;
    order.ensure_accepts_repairs(operation)?;
    Ok(repair)
}

/// Attach normalized items to a repair, reserving parts at the current price.
async fn add_items(
    ctx: &TransactionContext<'_>,
    repair: &mut AdditionalRepair,
    items: &RepairItems,
) -> AppResult<()> {
    let catalog = ctx.catalog();
    let repairs = ctx.repairs();

    for service_id in &items.service_ids {
        if repair.services.iter().any(|l| l.service_id == *service_id) {
            continue;
        }
        let service = active_service(&catalog, *service_id).await?;
        let line = repairs
            .add_service_line(repair.id, service.id, service.price)
            .await?;
        repair.services.push(line);
    }

    for request in &items.parts {
        let part = reserve_stock(&catalog, *request).await?;

        match repair.parts.iter_mut().find(|l| l.part_id == request.part_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(request.quantity).ok_or_else(|| {
                    DomainError::validation(format!("quantity of part {} is too large", part.id))
                })?;
                line.unit_price = part.price;
                repairs.update_part_line(line).await?;
            }
            None => {
                let line = repairs
                    .add_part_line(repair.id, part.id, request.quantity, part.price)
                    .await?;
                repair.parts.push(line);
            }
        }
    }

    Ok(())
}
