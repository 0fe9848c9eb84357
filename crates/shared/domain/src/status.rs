//! Lifecycle states of service orders and additional repairs.
//!
//! Statuses are persisted as short canonical strings (`IN_DIAGNOSIS`) and
//! parsed back through [`FromStr`]; unknown strings are rejected as invalid
//! input instead of being coerced to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Result of applying a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status moved along an edge of the graph
    Advanced,
    /// The requested status equals the current one; nothing changed
    Unchanged,
}

impl Transition {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Transition::Advanced)
    }
}

// =============================================================================
// Service order
// =============================================================================

/// Status of a service order.
///
/// ```text
/// RECEIVED → IN_DIAGNOSIS → AWAITING_APPROVAL → IN_EXECUTION → FINALIZED → DELIVERED
/// RECEIVED | IN_DIAGNOSIS | AWAITING_APPROVAL → CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceOrderStatus {
    Received,
    InDiagnosis,
    AwaitingApproval,
    InExecution,
    Finalized,
    Delivered,
    Cancelled,
}

impl ServiceOrderStatus {
    pub const ALL: [ServiceOrderStatus; 7] = [
        ServiceOrderStatus::Received,
        ServiceOrderStatus::InDiagnosis,
        ServiceOrderStatus::AwaitingApproval,
        ServiceOrderStatus::InExecution,
        ServiceOrderStatus::Finalized,
        ServiceOrderStatus::Delivered,
        ServiceOrderStatus::Cancelled,
    ];

    /// Canonical persisted representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOrderStatus::Received => "RECEIVED",
            ServiceOrderStatus::InDiagnosis => "IN_DIAGNOSIS",
            ServiceOrderStatus::AwaitingApproval => "AWAITING_APPROVAL",
            ServiceOrderStatus::InExecution => "IN_EXECUTION",
            ServiceOrderStatus::Finalized => "FINALIZED",
            ServiceOrderStatus::Delivered => "DELIVERED",
            ServiceOrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Services and parts may still be attached or detached
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::Received
                | ServiceOrderStatus::InDiagnosis
                | ServiceOrderStatus::AwaitingApproval
        )
    }

    /// Additional repairs may be created and progressed
    pub fn accepts_additional_repairs(&self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::InDiagnosis
                | ServiceOrderStatus::AwaitingApproval
                | ServiceOrderStatus::InExecution
        )
    }

    /// Whether `target` is a direct edge from this status
    pub fn can_transition_to(&self, target: ServiceOrderStatus) -> bool {
        use ServiceOrderStatus::*;

        matches!(
            (self, target),
            (Received, InDiagnosis)
                | (InDiagnosis, AwaitingApproval)
                | (AwaitingApproval, InExecution)
                | (InExecution, Finalized)
                | (Finalized, Delivered)
                | (Received | InDiagnosis | AwaitingApproval, Cancelled)
        )
    }

    /// Check a requested change; requesting the current status is a no-op.
    pub fn transition(&self, target: ServiceOrderStatus) -> DomainResult<Transition> {
        if *self == target {
            Ok(Transition::Unchanged)
        } else if self.can_transition_to(target) {
            Ok(Transition::Advanced)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }
}

impl fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceOrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown service order status '{}'", s)))
    }
}

// =============================================================================
// Additional repair
// =============================================================================

/// Approval status of an additional repair.
///
/// ```text
/// IN_ANALYSIS → AWAITING_APPROVAL → APPROVED
///                                 → REJECTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    InAnalysis,
    AwaitingApproval,
    Approved,
    Rejected,
}

impl RepairStatus {
    pub const ALL: [RepairStatus; 4] = [
        RepairStatus::InAnalysis,
        RepairStatus::AwaitingApproval,
        RepairStatus::Approved,
        RepairStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::InAnalysis => "IN_ANALYSIS",
            RepairStatus::AwaitingApproval => "AWAITING_APPROVAL",
            RepairStatus::Approved => "APPROVED",
            RepairStatus::Rejected => "REJECTED",
        }
    }

    /// APPROVED or REJECTED
    pub fn is_decided(&self) -> bool {
        matches!(self, RepairStatus::Approved | RepairStatus::Rejected)
    }

    pub fn can_transition_to(&self, target: RepairStatus) -> bool {
        use RepairStatus::*;

        matches!(
            (self, target),
            (InAnalysis, AwaitingApproval) | (AwaitingApproval, Approved | Rejected)
        )
    }

    pub fn transition(&self, target: RepairStatus) -> DomainResult<Transition> {
        if *self == target {
            Ok(Transition::Unchanged)
        } else if self.can_transition_to(target) {
            Ok(Transition::Advanced)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepairStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepairStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown additional repair status '{}'", s)))
    }
}

/// Customer decision on an additional repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairDecision {
    Approved,
    Rejected,
}

impl From<RepairDecision> for RepairStatus {
    fn from(decision: RepairDecision) -> Self {
        match decision {
            RepairDecision::Approved => RepairStatus::Approved,
            RepairDecision::Rejected => RepairStatus::Rejected,
        }
    }
}
