//! Workshop API Gateway Library
//!
//! The `/v1` JSON/HTTP surface of the service order engine. Handlers are thin:
//! they validate input, call the use cases behind
//! [`ServiceContainer`](order_service_lib::service::ServiceContainer) and map
//! errors to the `{ code, message }` envelope.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};

use common::{JwtKeys, WorkshopConfig};
use order_service_lib::infra::Database;
use order_service_lib::service::Services;

use crate::routes::create_router;
use crate::state::AppState;

/// Connect to the database, apply migrations and serve until Ctrl+C.
pub async fn run(config: WorkshopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let database = Database::connect(config.database_url.as_str()).await?;
    let services = Arc::new(Services::from_connection(database.get_connection()));
    let keys = Arc::new(JwtKeys::from_config(&config));

    let state = AppState::new(services, database, keys);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_addr().parse()?;
    info!("Workshop API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Workshop API stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}
