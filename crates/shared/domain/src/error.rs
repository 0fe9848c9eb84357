//! Domain-level errors.
//!
//! These errors represent business rule violations and reference failures.
//! They are independent of infrastructure concerns (HTTP, database).

use std::fmt;

use thiserror::Error;

use crate::money::Money;

/// Kind of entity a reference or lookup points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Customer,
    Vehicle,
    Service,
    Part,
    ServiceOrder,
    ServiceLine,
    PartLine,
    AdditionalRepair,
    Payment,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Customer => "customer",
            ReferenceKind::Vehicle => "vehicle",
            ReferenceKind::Service => "service",
            ReferenceKind::Part => "part",
            ReferenceKind::ServiceOrder => "service order",
            ReferenceKind::ServiceLine => "service line",
            ReferenceKind::PartLine => "part line",
            ReferenceKind::AdditionalRepair => "additional repair",
            ReferenceKind::Payment => "payment",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Requested status change is not an edge of the lifecycle graph
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Operation is not allowed while the order is in its current status
    #[error("cannot {operation} while service order is {status}")]
    InvalidOrderState {
        status: String,
        operation: &'static str,
    },

    /// Operation is not allowed while the additional repair is in its current status
    #[error("cannot {operation} while additional repair is {status}")]
    InvalidRepairState {
        status: String,
        operation: &'static str,
    },

    /// Order cannot close while additional repairs await a decision
    #[error("service order {order_id} has {count} additional repair(s) awaiting a decision")]
    PendingAdditionalRepairs { order_id: i32, count: usize },

    /// Requested part quantity exceeds free stock
    #[error("part {part_id}: requested {requested}, only {available} available")]
    InsufficientStock {
        part_id: i32,
        requested: u32,
        available: u32,
    },

    /// A payment was already recorded for the order
    #[error("service order {0} is already paid")]
    AlreadyPaid(i32),

    /// Payment amount differs from the order estimate
    #[error("payment amount {received} does not match estimate {expected}")]
    AmountMismatch { expected: Money, received: Money },

    /// Order status does not accept a payment
    #[error("service order in status {0} cannot be paid")]
    OrderNotPayable(String),

    /// Referenced entity does not exist
    #[error("unknown {kind} {id}")]
    UnknownReference { kind: ReferenceKind, id: i32 },

    /// Referenced entity exists but was soft-deleted
    #[error("{kind} {id} has been deleted")]
    SoftDeleted { kind: ReferenceKind, id: i32 },

    /// Entity addressed by the caller was not found
    #[error("{kind} {id} not found")]
    NotFound { kind: ReferenceKind, id: i32 },

    /// Internal domain error (corrupt persisted state)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create an unknown reference error
    pub fn unknown(kind: ReferenceKind, id: i32) -> Self {
        DomainError::UnknownReference { kind, id }
    }

    /// Create a not found error
    pub fn not_found(kind: ReferenceKind, id: i32) -> Self {
        DomainError::NotFound { kind, id }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "INVALID_INPUT",
            DomainError::InvalidTransition { .. } => "INVALID_TRANSITION",
            DomainError::InvalidOrderState { .. } => "INVALID_ORDER_STATE",
            DomainError::InvalidRepairState { .. } => "INVALID_REPAIR_STATE",
            DomainError::PendingAdditionalRepairs { .. } => "PENDING_ADDITIONAL_REPAIRS",
            DomainError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            DomainError::AlreadyPaid(_) => "ALREADY_PAID",
            DomainError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            DomainError::OrderNotPayable(_) => "ORDER_NOT_PAYABLE",
            DomainError::UnknownReference { .. } => "UNKNOWN_REFERENCE",
            DomainError::SoftDeleted { .. } => "SOFT_DELETED",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
