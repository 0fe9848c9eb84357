//! Service order database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, ServiceOrder};

use super::money_column;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    /// Canonical status string, e.g. `IN_DIAGNOSIS`
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub estimate: Decimal,
    pub started_at: Option<DateTimeUtc>,
    pub finished_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ServiceOrder {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse()
            .map_err(|_| DomainError::internal(format!("corrupt order status '{}'", model.status)))?;

        Ok(ServiceOrder {
            id: model.id,
            customer_id: model.customer_id,
            vehicle_id: model.vehicle_id,
            status,
            estimate: money_column(model.estimate)?,
            started_at: model.started_at,
            finished_at: model.finished_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
