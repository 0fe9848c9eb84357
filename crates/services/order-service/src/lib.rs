//! Order Service Library
//!
//! The service order lifecycle engine: persistence, the catalog gateway and
//! the three core components (`ServiceOrderManager`,
//! `AdditionalRepairCoordinator`, `PaymentCloser`). The HTTP gateway embeds it
//! through [`service::Services`].

pub mod catalog;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use common::WorkshopConfig;

use crate::infra::Database;

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &WorkshopConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(config.database_url.as_str()).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
