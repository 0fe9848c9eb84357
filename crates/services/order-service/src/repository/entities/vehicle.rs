//! Vehicle database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Vehicle;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    #[sea_orm(unique)]
    pub plate: String,
    pub brand: String,
    pub model_name: String,
    pub year: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vehicle {
    fn from(model: Model) -> Self {
        Vehicle {
            id: model.id,
            customer_id: model.customer_id,
            plate: model.plate,
            deleted: model.deleted_at.is_some(),
        }
    }
}
