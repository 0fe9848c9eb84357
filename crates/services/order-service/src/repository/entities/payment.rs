//! Payment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, Payment};

use super::money_column;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// At most one payment per order
    #[sea_orm(unique)]
    pub service_order_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: model.id,
            service_order_id: model.service_order_id,
            amount: money_column(model.amount)?,
            paid_at: model.paid_at,
        })
    }
}
