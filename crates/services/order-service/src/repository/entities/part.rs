//! Part (inventory item) database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{CatalogPart, DomainError};

use super::{money_column, quantity_column};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub quantity_total: i32,
    /// Units held by order lines and undecided or approved repairs
    pub quantity_reserved: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CatalogPart {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(CatalogPart {
            id: model.id,
            name: model.name,
            price: money_column(model.price)?,
            quantity_total: quantity_column(model.quantity_total)?,
            quantity_reserved: quantity_column(model.quantity_reserved)?,
            deleted: model.deleted_at.is_some(),
        })
    }
}
