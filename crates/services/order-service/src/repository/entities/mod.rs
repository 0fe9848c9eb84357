//! SeaORM entities, one module per table.

pub mod additional_repair;
pub mod additional_repair_part;
pub mod additional_repair_service;
pub mod catalog_service;
pub mod customer;
pub mod part;
pub mod payment;
pub mod service_order;
pub mod service_order_part;
pub mod service_order_service;
pub mod vehicle;

use rust_decimal::Decimal;

use domain::{DomainError, DomainResult, Money, MONEY_SCALE};

/// Read a `decimal(10,2)` column back into `Money`.
pub(crate) fn money_column(value: Decimal) -> DomainResult<Money> {
    Money::new(value.round_dp(MONEY_SCALE))
        .map_err(|e| DomainError::internal(format!("corrupt money column: {}", e)))
}

/// Read a non-negative integer column.
pub(crate) fn quantity_column(value: i32) -> DomainResult<u32> {
    u32::try_from(value)
        .map_err(|_| DomainError::internal(format!("corrupt quantity column: {}", value)))
}

/// Write a quantity into an integer column.
pub(crate) fn quantity_value(quantity: u32) -> DomainResult<i32> {
    i32::try_from(quantity)
        .map_err(|_| DomainError::validation(format!("quantity {} is too large", quantity)))
}
