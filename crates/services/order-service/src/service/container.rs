//! Service Container - Centralized access to the order engine's use cases.

use std::sync::Arc;

use super::{
    AdditionalRepairCoordinator, AdditionalRepairService, PaymentCloser, PaymentService,
    ServiceOrderManager, ServiceOrderService,
};
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn orders(&self) -> Arc<dyn ServiceOrderService>;

    fn repairs(&self) -> Arc<dyn AdditionalRepairService>;

    fn payments(&self) -> Arc<dyn PaymentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    order_service: Arc<dyn ServiceOrderService>,
    repair_service: Arc<dyn AdditionalRepairService>,
    payment_service: Arc<dyn PaymentService>,
}

impl Services {
    pub fn new(
        order_service: Arc<dyn ServiceOrderService>,
        repair_service: Arc<dyn AdditionalRepairService>,
        payment_service: Arc<dyn PaymentService>,
    ) -> Self {
        Self {
            order_service,
            repair_service,
            payment_service,
        }
    }

    /// Wire every use case to one shared unit of work over `db`.
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            order_service: Arc::new(ServiceOrderManager::new(uow.clone())),
            repair_service: Arc::new(AdditionalRepairCoordinator::new(uow.clone())),
            payment_service: Arc::new(PaymentCloser::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn orders(&self) -> Arc<dyn ServiceOrderService> {
        self.order_service.clone()
    }

    fn repairs(&self) -> Arc<dyn AdditionalRepairService> {
        self.repair_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }
}
