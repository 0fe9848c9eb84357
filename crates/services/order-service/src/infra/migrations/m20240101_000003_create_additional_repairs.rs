//! Migration: Create additional repairs and their service/part lines.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_catalog_tables::{CatalogServices, Parts};
use super::m20240101_000002_create_service_orders::ServiceOrders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdditionalRepairs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdditionalRepairs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdditionalRepairs::ServiceOrderId).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairs::Description).text().not_null())
                    .col(ColumnDef::new(AdditionalRepairs::Status).string_len(32).not_null())
                    .col(ColumnDef::new(AdditionalRepairs::EstimateDelta).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(AdditionalRepairs::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(AdditionalRepairs::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_repairs_order")
                            .from(AdditionalRepairs::Table, AdditionalRepairs::ServiceOrderId)
                            .to(ServiceOrders::Table, ServiceOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdditionalRepairServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdditionalRepairServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdditionalRepairServices::AdditionalRepairId).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairServices::ServiceId).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairServices::UnitPrice).decimal_len(10, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_repair_services_repair")
                            .from(AdditionalRepairServices::Table, AdditionalRepairServices::AdditionalRepairId)
                            .to(AdditionalRepairs::Table, AdditionalRepairs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_repair_services_service")
                            .from(AdditionalRepairServices::Table, AdditionalRepairServices::ServiceId)
                            .to(CatalogServices::Table, CatalogServices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdditionalRepairParts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdditionalRepairParts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdditionalRepairParts::AdditionalRepairId).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairParts::PartId).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairParts::Quantity).integer().not_null())
                    .col(ColumnDef::new(AdditionalRepairParts::UnitPrice).decimal_len(10, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_repair_parts_repair")
                            .from(AdditionalRepairParts::Table, AdditionalRepairParts::AdditionalRepairId)
                            .to(AdditionalRepairs::Table, AdditionalRepairs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_repair_parts_part")
                            .from(AdditionalRepairParts::Table, AdditionalRepairParts::PartId)
                            .to(Parts::Table, Parts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_additional_repairs_order_id")
                    .table(AdditionalRepairs::Table)
                    .col(AdditionalRepairs::ServiceOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdditionalRepairParts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdditionalRepairServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdditionalRepairs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdditionalRepairs {
    Table,
    Id,
    ServiceOrderId,
    Description,
    Status,
    EstimateDelta,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AdditionalRepairServices {
    Table,
    Id,
    AdditionalRepairId,
    ServiceId,
    UnitPrice,
}

#[derive(Iden)]
enum AdditionalRepairParts {
    Table,
    Id,
    AdditionalRepairId,
    PartId,
    Quantity,
    UnitPrice,
}
