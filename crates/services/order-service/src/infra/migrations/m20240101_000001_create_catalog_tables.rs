//! Migration: Create catalog tables (customers, vehicles, services, parts).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Document).string_len(18).not_null().unique_key())
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Customers::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Plate).string_len(10).not_null().unique_key())
                    .col(ColumnDef::new(Vehicles::Brand).string().not_null())
                    .col(ColumnDef::new(Vehicles::ModelName).string().not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Vehicles::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Vehicles::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_customer")
                            .from(Vehicles::Table, Vehicles::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CatalogServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogServices::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(CatalogServices::Description).text().null())
                    .col(ColumnDef::new(CatalogServices::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(CatalogServices::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CatalogServices::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CatalogServices::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Parts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parts::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Parts::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Parts::QuantityTotal).integer().not_null().default(0))
                    .col(ColumnDef::new(Parts::QuantityReserved).integer().not_null().default(0))
                    .col(ColumnDef::new(Parts::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Parts::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Parts::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_customer_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Customers {
    Table,
    Id,
    Name,
    Document,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub(super) enum Vehicles {
    Table,
    Id,
    CustomerId,
    Plate,
    Brand,
    ModelName,
    Year,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub(super) enum CatalogServices {
    Table,
    Id,
    Name,
    Description,
    Price,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub(super) enum Parts {
    Table,
    Id,
    Name,
    Price,
    QuantityTotal,
    QuantityReserved,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
