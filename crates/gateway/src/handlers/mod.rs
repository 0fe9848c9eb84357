//! HTTP handlers, one module per resource.

pub mod additional_repair_handler;
pub mod health_handler;
pub mod items;
pub mod payment_handler;
pub mod service_order_handler;

pub use additional_repair_handler::additional_repair_routes;
pub use health_handler::health_routes;
pub use payment_handler::payment_routes;
pub use service_order_handler::service_order_routes;
