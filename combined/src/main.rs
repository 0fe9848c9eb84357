//! Workshop API binary - HTTP server, migrations and staff tokens.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{JwtKeys, WorkshopConfig};

#[derive(Parser)]
#[command(name = "workshop-api")]
#[command(about = "Service order engine for the repair shop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and serve the /v1 API on HTTP_PORT
    Serve,
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Mint a bearer token for staff tooling
    Token {
        /// Name recorded as the token subject
        #[arg(long, default_value = "front-desk")]
        subject: String,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateAction> for order_service_lib::MigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => order_service_lib::MigrateAction::Up,
            MigrateAction::Down => order_service_lib::MigrateAction::Down,
            MigrateAction::Status => order_service_lib::MigrateAction::Status,
            MigrateAction::Fresh => order_service_lib::MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    // Loads .env, then validates before anything starts
    let config = WorkshopConfig::from_env()?;

    match cli.command {
        Commands::Serve => {
            info!(config = ?config, "Starting workshop API");
            gateway_lib::run(config).await?;
        }
        Commands::Migrate { action } => {
            order_service_lib::run_migrations(&config, action.into()).await?;
        }
        Commands::Token { subject } => {
            let token = JwtKeys::from_config(&config).issue(&subject)?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
    }

    Ok(())
}
