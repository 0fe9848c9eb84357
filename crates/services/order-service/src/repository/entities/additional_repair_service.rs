//! Service line of an additional repair.

use sea_orm::entity::prelude::*;

use domain::{DomainError, ServiceLine};

use super::money_column;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "additional_repair_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub additional_repair_id: i32,
    pub service_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ServiceLine {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(ServiceLine {
            id: model.id,
            service_id: model.service_id,
            unit_price: money_column(model.unit_price)?,
        })
    }
}
