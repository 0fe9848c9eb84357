//! Relational catalog gateway.
//!
//! Reservations are single conditional `UPDATE` statements, so two orders
//! racing for the last units cannot both succeed.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};

use common::{AppError, AppResult};
use domain::catalog::ensure_active;
use domain::{CatalogPart, CatalogService, Customer, DomainError, ReferenceKind, Vehicle};

use super::entities::catalog_service::Entity as CatalogServiceEntity;
use super::entities::customer::Entity as CustomerEntity;
use super::entities::part::{self, Entity as PartEntity};
use super::entities::quantity_value;
use super::entities::vehicle::Entity as VehicleEntity;
use crate::catalog::CatalogGateway;

/// Catalog gateway bound to the current transaction.
pub struct TxCatalog<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCatalog<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> CatalogGateway for TxCatalog<'a> {
    async fn lookup_service(&self, id: i32) -> AppResult<CatalogService> {
        let model = CatalogServiceEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::unknown(ReferenceKind::Service, id)))?;

        Ok(CatalogService::try_from(model)?)
    }

    async fn lookup_part(&self, id: i32) -> AppResult<CatalogPart> {
        let model = PartEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::unknown(ReferenceKind::Part, id)))?;

        Ok(CatalogPart::try_from(model)?)
    }

    async fn reserve_part(&self, id: i32, quantity: u32) -> AppResult<()> {
        let quantity = quantity_value(quantity)?;

        let result = PartEntity::update_many()
            .col_expr(
                part::Column::QuantityReserved,
                Expr::col(part::Column::QuantityReserved).add(quantity),
            )
            .filter(part::Column::Id.eq(id))
            .filter(part::Column::DeletedAt.is_null())
            .filter(
                Expr::col(part::Column::QuantityReserved)
                    .lte(Expr::col(part::Column::QuantityTotal).sub(quantity)),
            )
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            // Work out which rule the guard tripped on.
            let part = self.lookup_part(id).await?;
            ensure_active(ReferenceKind::Part, id, part.deleted)?;
            return Err(DomainError::InsufficientStock {
                part_id: id,
                requested: quantity as u32,
                available: part.available(),
            }
            .into());
        }

        tracing::debug!(part_id = id, quantity, "part reserved");
        Ok(())
    }

    async fn release_part(&self, id: i32, quantity: u32) -> AppResult<()> {
        let quantity = quantity_value(quantity)?;

        let result = PartEntity::update_many()
            .col_expr(
                part::Column::QuantityReserved,
                Expr::col(part::Column::QuantityReserved).sub(quantity),
            )
            .filter(part::Column::Id.eq(id))
            .filter(part::Column::QuantityReserved.gte(quantity))
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::internal(format!(
                "cannot release {} units of part {}: reservation ledger out of sync",
                quantity, id
            ))
            .into());
        }

        tracing::debug!(part_id = id, quantity, "part released");
        Ok(())
    }

    async fn lookup_customer(&self, id: i32) -> AppResult<Customer> {
        let model = CustomerEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::unknown(ReferenceKind::Customer, id)))?;

        Ok(Customer::from(model))
    }

    async fn lookup_vehicle(&self, id: i32) -> AppResult<Vehicle> {
        let model = VehicleEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::from(DomainError::unknown(ReferenceKind::Vehicle, id)))?;

        Ok(Vehicle::from(model))
    }
}
