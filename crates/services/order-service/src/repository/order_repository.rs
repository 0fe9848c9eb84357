//! Service order repository: headers and their service/part lines.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use common::{AppError, AppResult, PaginationParams};
use domain::{
    DomainError, Money, PartLine, ReferenceKind, ServiceLine, ServiceOrder, ServiceOrderStatus,
};

use super::entities::quantity_value;
use super::entities::service_order::{self, Entity as ServiceOrderEntity};
use super::entities::service_order_part::{self, Entity as OrderPartEntity};
use super::entities::service_order_service::{self, Entity as OrderServiceEntity};

/// Transaction-bound access to service orders.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<ServiceOrder>> {
        let model = ServiceOrderEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(ServiceOrder::try_from).transpose()?)
    }

    /// Find an order or fail with `NotFound`.
    pub async fn get(&self, id: i32) -> AppResult<ServiceOrder> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ReferenceKind::ServiceOrder, id).into())
    }

    /// Insert a new order in `RECEIVED` with a zero estimate.
    pub async fn create(
        &self,
        customer_id: i32,
        vehicle_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ServiceOrder> {
        let active_model = service_order::ActiveModel {
            customer_id: Set(customer_id),
            vehicle_id: Set(vehicle_id),
            status: Set(ServiceOrderStatus::Received.as_str().to_string()),
            estimate: Set(Money::ZERO.amount()),
            started_at: Set(None),
            finished_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(ServiceOrder::try_from(model)?)
    }

    /// Persist status, estimate and timestamps of `order`.
    pub async fn save(&self, order: &ServiceOrder) -> AppResult<()> {
        let model = ServiceOrderEntity::find_by_id(order.id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::not_found(ReferenceKind::ServiceOrder, order.id)))?;

        let mut active: service_order::ActiveModel = model.into();
        active.status = Set(order.status.as_str().to_string());
        active.estimate = Set(order.estimate.amount());
        active.started_at = Set(order.started_at);
        active.finished_at = Set(order.finished_at);
        active.updated_at = Set(order.updated_at);

        active.update(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Page through orders, newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<ServiceOrderStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<ServiceOrder>, u64)> {
        let mut query = ServiceOrderEntity::find();
        if let Some(status) = status {
            query = query.filter(service_order::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(self.txn).await?;
        let models = query
            .order_by_desc(service_order::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(self.txn)
            .await?;

        let orders = models
            .into_iter()
            .map(ServiceOrder::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total))
    }

    pub async fn service_lines(&self, order_id: i32) -> AppResult<Vec<ServiceLine>> {
        let models = OrderServiceEntity::find()
            .filter(service_order_service::Column::ServiceOrderId.eq(order_id))
            .order_by_asc(service_order_service::Column::Id)
            .all(self.txn)
            .await?;

        Ok(models
            .into_iter()
            .map(ServiceLine::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn part_lines(&self, order_id: i32) -> AppResult<Vec<PartLine>> {
        let models = OrderPartEntity::find()
            .filter(service_order_part::Column::ServiceOrderId.eq(order_id))
            .order_by_asc(service_order_part::Column::Id)
            .all(self.txn)
            .await?;

        Ok(models
            .into_iter()
            .map(PartLine::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Append a service line with its price snapshot.
    pub async fn add_service_line(
        &self,
        order_id: i32,
        service_id: i32,
        unit_price: Money,
    ) -> AppResult<ServiceLine> {
        let model = service_order_service::ActiveModel {
            service_order_id: Set(order_id),
            service_id: Set(service_id),
            unit_price: Set(unit_price.amount()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(ServiceLine::try_from(model)?)
    }

    /// Append a part line with its price snapshot.
    pub async fn add_part_line(
        &self,
        order_id: i32,
        part_id: i32,
        quantity: u32,
        unit_price: Money,
    ) -> AppResult<PartLine> {
        let model = service_order_part::ActiveModel {
            service_order_id: Set(order_id),
            part_id: Set(part_id),
            quantity: Set(quantity_value(quantity)?),
            unit_price: Set(unit_price.amount()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(PartLine::try_from(model)?)
    }

    /// Delete one service line of `order_id`, returning it.
    pub async fn remove_service_line(&self, order_id: i32, line_id: i32) -> AppResult<ServiceLine> {
        let model = OrderServiceEntity::find_by_id(line_id)
            .filter(service_order_service::Column::ServiceOrderId.eq(order_id))
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::not_found(ReferenceKind::ServiceLine, line_id)))?;

        let line = ServiceLine::try_from(model.clone())?;
        model.delete(self.txn).await?;
        Ok(line)
    }

    /// Delete one part line of `order_id`, returning it so the caller can
    /// release its reservation.
    pub async fn remove_part_line(&self, order_id: i32, line_id: i32) -> AppResult<PartLine> {
        let model = OrderPartEntity::find_by_id(line_id)
            .filter(service_order_part::Column::ServiceOrderId.eq(order_id))
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::not_found(ReferenceKind::PartLine, line_id)))?;

        let line = PartLine::try_from(model.clone())?;
        model.delete(self.txn).await?;
        Ok(line)
    }
}
