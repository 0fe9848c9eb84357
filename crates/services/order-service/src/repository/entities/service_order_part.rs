//! Part line of a service order.

use sea_orm::entity::prelude::*;

use domain::{DomainError, PartLine};

use super::{money_column, quantity_column};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_order_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_order_id: i32,
    pub part_id: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PartLine {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(PartLine {
            id: model.id,
            part_id: model.part_id,
            quantity: quantity_column(model.quantity)?,
            unit_price: money_column(model.unit_price)?,
        })
    }
}
