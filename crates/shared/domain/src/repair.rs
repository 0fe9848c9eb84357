//! Additional repairs discovered after the initial estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_DESCRIPTION_LENGTH;
use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::order::{dedup_service_ids, merge_part_requests, PartLine, PartRequest, ServiceLine};
use crate::status::{RepairStatus, Transition};

/// Additional repair with its own lines and approval status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdditionalRepair {
    pub id: i32,
    pub service_order_id: i32,
    pub description: String,
    pub status: RepairStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "110.00"))]
    pub estimate_delta: Money,
    pub services: Vec<ServiceLine>,
    pub parts: Vec<PartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdditionalRepair {
    /// Fail unless the repair is currently in `expected`.
    pub fn ensure_status(&self, expected: RepairStatus, operation: &'static str) -> DomainResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidRepairState {
                status: self.status.to_string(),
                operation,
            })
        }
    }

    /// Move to `target` along the approval graph.
    pub fn apply_status(&mut self, target: RepairStatus, now: DateTime<Utc>) -> DomainResult<Transition> {
        let transition = self.status.transition(target)?;
        if transition.is_advanced() {
            self.status = target;
            self.updated_at = now;
        }
        Ok(transition)
    }
}

/// Trimmed, length-checked repair description.
pub fn normalize_description(description: &str) -> DomainResult<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(DomainError::validation("description cannot be empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::validation(format!(
            "description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(description.to_string())
}

/// Set of catalog items added to or removed from a repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairItems {
    pub service_ids: Vec<i32>,
    pub parts: Vec<PartRequest>,
}

impl RepairItems {
    /// Dedupe services and merge part quantities
    pub fn normalized(&self) -> DomainResult<RepairItems> {
        Ok(RepairItems {
            service_ids: dedup_service_ids(&self.service_ids),
            parts: merge_part_requests(&self.parts)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty() && self.parts.is_empty()
    }
}

/// Planned effect of removing items from a repair's current lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// Service lines to delete
    pub service_line_ids: Vec<i32>,
    /// Part lines to delete outright
    pub deleted_part_lines: Vec<i32>,
    /// Part lines whose quantity shrinks: (line id, new quantity)
    pub reduced_part_lines: Vec<(i32, u32)>,
    /// Stock to release per part
    pub released: Vec<PartRequest>,
}

/// Work out which lines a removal touches. Removing an item the repair does
/// not hold, or more units than it holds, is invalid input.
pub fn plan_removal(
    services: &[ServiceLine],
    parts: &[PartLine],
    remove: &RepairItems,
) -> DomainResult<Removal> {
    let mut removal = Removal::default();

    for service_id in &remove.service_ids {
        let line = services
            .iter()
            .find(|l| l.service_id == *service_id)
            .ok_or_else(|| {
                DomainError::validation(format!("service {} is not part of this repair", service_id))
            })?;
        removal.service_line_ids.push(line.id);
    }

    for request in &remove.parts {
        let line = parts
            .iter()
            .find(|l| l.part_id == request.part_id)
            .ok_or_else(|| {
                DomainError::validation(format!("part {} is not part of this repair", request.part_id))
            })?;

        if request.quantity > line.quantity {
            return Err(DomainError::validation(format!(
                "cannot remove {} of part {}, repair holds {}",
                request.quantity, request.part_id, line.quantity
            )));
        }

        if request.quantity == line.quantity {
            removal.deleted_part_lines.push(line.id);
        } else {
            removal
                .reduced_part_lines
                .push((line.id, line.quantity - request.quantity));
        }
        removal.released.push(*request);
    }

    Ok(removal)
}
