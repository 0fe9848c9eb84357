//! Application services layer - the order engine's use cases.
//!
//! Each use case runs in exactly one unit-of-work transaction; the managers
//! depend on the [`UnitOfWork`](crate::infra::UnitOfWork) abstraction and on
//! the catalog gateway handed out by the transaction context.

pub mod container;
mod estimate;
mod order_service;
mod payment_service;
mod repair_service;

pub use container::{ServiceContainer, Services};
pub use order_service::{ServiceOrderManager, ServiceOrderService};
pub use payment_service::{PaymentCloser, PaymentService};
pub use repair_service::{AdditionalRepairCoordinator, AdditionalRepairService, NewAdditionalRepair};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
