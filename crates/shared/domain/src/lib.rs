//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the service order and additional repair lifecycles, the estimate arithmetic
//! and the payment closing rule.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod repair;
pub mod status;

pub use catalog::{CatalogPart, CatalogService, Customer, Vehicle};
pub use constants::*;
pub use error::{DomainError, DomainResult, ReferenceKind};
pub use money::Money;
pub use order::{
    dedup_service_ids, estimate_of, merge_part_requests, PartLine, PartRequest, ServiceLine,
    ServiceOrder, ServiceOrderDetails,
};
pub use payment::{ensure_payable, Payment};
pub use repair::{normalize_description, plan_removal, AdditionalRepair, Removal, RepairItems};
pub use status::{RepairDecision, RepairStatus, ServiceOrderStatus, Transition};
