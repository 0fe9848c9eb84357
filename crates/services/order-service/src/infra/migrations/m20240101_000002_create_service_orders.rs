//! Migration: Create service orders and their service/part lines.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_catalog_tables::{CatalogServices, Customers, Parts, Vehicles};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOrders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrders::VehicleId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrders::Status).string_len(32).not_null())
                    .col(ColumnDef::new(ServiceOrders::Estimate).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(ServiceOrders::StartedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(ServiceOrders::FinishedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(ServiceOrders::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ServiceOrders::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_customer")
                            .from(ServiceOrders::Table, ServiceOrders::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_vehicle")
                            .from(ServiceOrders::Table, ServiceOrders::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceOrderServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOrderServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOrderServices::ServiceOrderId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrderServices::ServiceId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrderServices::UnitPrice).decimal_len(10, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_services_order")
                            .from(ServiceOrderServices::Table, ServiceOrderServices::ServiceOrderId)
                            .to(ServiceOrders::Table, ServiceOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_services_service")
                            .from(ServiceOrderServices::Table, ServiceOrderServices::ServiceId)
                            .to(CatalogServices::Table, CatalogServices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceOrderParts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOrderParts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOrderParts::ServiceOrderId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrderParts::PartId).integer().not_null())
                    .col(ColumnDef::new(ServiceOrderParts::Quantity).integer().not_null())
                    .col(ColumnDef::new(ServiceOrderParts::UnitPrice).decimal_len(10, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_parts_order")
                            .from(ServiceOrderParts::Table, ServiceOrderParts::ServiceOrderId)
                            .to(ServiceOrders::Table, ServiceOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_parts_part")
                            .from(ServiceOrderParts::Table, ServiceOrderParts::PartId)
                            .to(Parts::Table, Parts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters by status
        manager
            .create_index(
                Index::create()
                    .name("idx_service_orders_status")
                    .table(ServiceOrders::Table)
                    .col(ServiceOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_order_services_order_id")
                    .table(ServiceOrderServices::Table)
                    .col(ServiceOrderServices::ServiceOrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_order_parts_order_id")
                    .table(ServiceOrderParts::Table)
                    .col(ServiceOrderParts::ServiceOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceOrderParts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOrderServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum ServiceOrders {
    Table,
    Id,
    CustomerId,
    VehicleId,
    Status,
    Estimate,
    StartedAt,
    FinishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ServiceOrderServices {
    Table,
    Id,
    ServiceOrderId,
    ServiceId,
    UnitPrice,
}

#[derive(Iden)]
enum ServiceOrderParts {
    Table,
    Id,
    ServiceOrderId,
    PartId,
    Quantity,
    UnitPrice,
}
