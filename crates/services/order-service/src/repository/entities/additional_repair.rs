//! Additional repair database entity for SeaORM.
//!
//! Lines live in `additional_repair_services` and `additional_repair_parts`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "additional_repairs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_order_id: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Canonical status string, e.g. `AWAITING_APPROVAL`
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub estimate_delta: Decimal,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
