//! Additional repair repository.
//!
//! A repair is stored as a header row plus service and part line rows; the
//! repository always hands out the assembled aggregate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use common::{AppError, AppResult};
use domain::{
    AdditionalRepair, DomainError, DomainResult, Money, PartLine, ReferenceKind, RepairStatus,
    ServiceLine,
};

use super::entities::additional_repair::{self, Entity as RepairEntity};
use super::entities::additional_repair_part::{self, Entity as RepairPartEntity};
use super::entities::additional_repair_service::{self, Entity as RepairServiceEntity};
use super::entities::{money_column, quantity_value};

/// Transaction-bound access to additional repairs.
pub struct TxRepairRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRepairRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<AdditionalRepair>> {
        let Some(header) = RepairEntity::find_by_id(id).one(self.txn).await? else {
            return Ok(None);
        };

        let services = self.service_models(&[id]).await?;
        let parts = self.part_models(&[id]).await?;
        Ok(Some(assemble(header, services, parts)?))
    }

    /// Find a repair or fail with `NotFound`.
    pub async fn get(&self, id: i32) -> AppResult<AdditionalRepair> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ReferenceKind::AdditionalRepair, id).into())
    }

    /// Every repair of an order, oldest first.
    pub async fn for_order(&self, order_id: i32) -> AppResult<Vec<AdditionalRepair>> {
        let headers = RepairEntity::find()
            .filter(additional_repair::Column::ServiceOrderId.eq(order_id))
            .order_by_asc(additional_repair::Column::Id)
            .all(self.txn)
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = headers.iter().map(|h| h.id).collect();
        let mut services: HashMap<i32, Vec<additional_repair_service::Model>> = HashMap::new();
        for model in self.service_models(&ids).await? {
            services.entry(model.additional_repair_id).or_default().push(model);
        }
        let mut parts: HashMap<i32, Vec<additional_repair_part::Model>> = HashMap::new();
        for model in self.part_models(&ids).await? {
            parts.entry(model.additional_repair_id).or_default().push(model);
        }

        let repairs = headers
            .into_iter()
            .map(|header| {
                let id = header.id;
                assemble(
                    header,
                    services.remove(&id).unwrap_or_default(),
                    parts.remove(&id).unwrap_or_default(),
                )
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(repairs)
    }

    /// Sum of the deltas of an order's approved repairs.
    pub async fn approved_total(&self, order_id: i32) -> AppResult<Money> {
        let headers = RepairEntity::find()
            .filter(additional_repair::Column::ServiceOrderId.eq(order_id))
            .filter(additional_repair::Column::Status.eq(RepairStatus::Approved.as_str()))
            .all(self.txn)
            .await?;

        let mut total = Money::ZERO;
        for header in headers {
            total = total.checked_add(money_column(header.estimate_delta)?)?;
        }
        Ok(total)
    }

    /// Insert an empty repair in `IN_ANALYSIS`.
    pub async fn create(
        &self,
        order_id: i32,
        description: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AdditionalRepair> {
        let header = additional_repair::ActiveModel {
            service_order_id: Set(order_id),
            description: Set(description.to_string()),
            status: Set(RepairStatus::InAnalysis.as_str().to_string()),
            estimate_delta: Set(Money::ZERO.amount()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        Ok(assemble(header, Vec::new(), Vec::new())?)
    }

    /// Persist status, delta and update time of the header.
    pub async fn save(&self, repair: &AdditionalRepair) -> AppResult<()> {
        let header = RepairEntity::find_by_id(repair.id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                AppError::from(DomainError::not_found(ReferenceKind::AdditionalRepair, repair.id))
            })?;

        let mut active: additional_repair::ActiveModel = header.into();
        active.status = Set(repair.status.as_str().to_string());
        active.estimate_delta = Set(repair.estimate_delta.amount());
        active.updated_at = Set(repair.updated_at);

        active.update(self.txn).await?;
        Ok(())
    }

    pub async fn add_service_line(
        &self,
        repair_id: i32,
        service_id: i32,
        unit_price: Money,
    ) -> AppResult<ServiceLine> {
        let model = additional_repair_service::ActiveModel {
            additional_repair_id: Set(repair_id),
            service_id: Set(service_id),
            unit_price: Set(unit_price.amount()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(ServiceLine::try_from(model)?)
    }

    pub async fn add_part_line(
        &self,
        repair_id: i32,
        part_id: i32,
        quantity: u32,
        unit_price: Money,
    ) -> AppResult<PartLine> {
        let model = additional_repair_part::ActiveModel {
            additional_repair_id: Set(repair_id),
            part_id: Set(part_id),
            quantity: Set(quantity_value(quantity)?),
            unit_price: Set(unit_price.amount()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(PartLine::try_from(model)?)
    }

    /// Overwrite quantity and price snapshot of a part line.
    pub async fn update_part_line(&self, line: &PartLine) -> AppResult<()> {
        let model = RepairPartEntity::find_by_id(line.id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::not_found(ReferenceKind::PartLine, line.id)))?;

        let mut active: additional_repair_part::ActiveModel = model.into();
        active.quantity = Set(quantity_value(line.quantity)?);
        active.unit_price = Set(line.unit_price.amount());

        active.update(self.txn).await?;
        Ok(())
    }

    pub async fn delete_service_lines(&self, line_ids: &[i32]) -> AppResult<()> {
        if line_ids.is_empty() {
            return Ok(());
        }
        RepairServiceEntity::delete_many()
            .filter(additional_repair_service::Column::Id.is_in(line_ids.iter().copied()))
            .exec(self.txn)
            .await?;
        Ok(())
    }

    pub async fn delete_part_lines(&self, line_ids: &[i32]) -> AppResult<()> {
        if line_ids.is_empty() {
            return Ok(());
        }
        RepairPartEntity::delete_many()
            .filter(additional_repair_part::Column::Id.is_in(line_ids.iter().copied()))
            .exec(self.txn)
            .await?;
        Ok(())
    }

    /// Drop every line of a repair.
    pub async fn clear_lines(&self, repair_id: i32) -> AppResult<()> {
        RepairServiceEntity::delete_many()
            .filter(additional_repair_service::Column::AdditionalRepairId.eq(repair_id))
            .exec(self.txn)
            .await?;
        RepairPartEntity::delete_many()
            .filter(additional_repair_part::Column::AdditionalRepairId.eq(repair_id))
            .exec(self.txn)
            .await?;
        Ok(())
    }

    async fn service_models(
        &self,
        repair_ids: &[i32],
    ) -> AppResult<Vec<additional_repair_service::Model>> {
        Ok(RepairServiceEntity::find()
            .filter(additional_repair_service::Column::AdditionalRepairId.is_in(repair_ids.iter().copied()))
            .order_by_asc(additional_repair_service::Column::Id)
            .all(self.txn)
            .await?)
    }

    async fn part_models(&self, repair_ids: &[i32]) -> AppResult<Vec<additional_repair_part::Model>> {
        Ok(RepairPartEntity::find()
            .filter(additional_repair_part::Column::AdditionalRepairId.is_in(repair_ids.iter().copied()))
            .order_by_asc(additional_repair_part::Column::Id)
            .all(self.txn)
            .await?)
    }
}

fn assemble(
    header: additional_repair::Model,
    services: Vec<additional_repair_service::Model>,
    parts: Vec<additional_repair_part::Model>,
) -> DomainResult<AdditionalRepair> {
    let status: RepairStatus = header.status.parse().map_err(|_| {
        DomainError::internal(format!("corrupt repair status '{}'", header.status))
    })?;

    Ok(AdditionalRepair {
        id: header.id,
        service_order_id: header.service_order_id,
        description: header.description,
        status,
        estimate_delta: money_column(header.estimate_delta)?,
        services: services
            .into_iter()
            .map(ServiceLine::try_from)
            .collect::<DomainResult<Vec<_>>>()?,
        parts: parts
            .into_iter()
            .map(PartLine::try_from)
            .collect::<DomainResult<Vec<_>>>()?,
        created_at: header.created_at,
        updated_at: header.updated_at,
    })
}
