//! Service order entity and its composition lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_PART_QUANTITY;
use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::repair::AdditionalRepair;
use crate::status::{RepairStatus, ServiceOrderStatus, Transition};

/// Catalog service attached to an order or a repair at a snapshotted price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceLine {
    pub id: i32,
    pub service_id: i32,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "100.00"))]
    pub unit_price: Money,
}

impl ServiceLine {
    pub fn total(&self) -> Money {
        self.unit_price
    }
}

/// Catalog part attached with a quantity; the quantity is held as a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PartLine {
    pub id: i32,
    pub part_id: i32,
    pub quantity: u32,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "50.00"))]
    pub unit_price: Money,
}

impl PartLine {
    pub fn total(&self) -> DomainResult<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Sum of service lines at snapshot price plus part lines at snapshot price × quantity.
///
/// Fails with `INVALID_INPUT` when the sum no longer fits a money column.
pub fn estimate_of(services: &[ServiceLine], parts: &[PartLine]) -> DomainResult<Money> {
    let parts = parts
        .iter()
        .map(PartLine::total)
        .collect::<DomainResult<Vec<_>>>()?;
    Money::total(services.iter().map(ServiceLine::total).chain(parts))
}

/// Requested part and quantity, before resolution against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRequest {
    pub part_id: i32,
    pub quantity: u32,
}

impl PartRequest {
    pub fn new(part_id: i32, quantity: u32) -> DomainResult<Self> {
        if quantity < MIN_PART_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity for part {} must be at least {}",
                part_id, MIN_PART_QUANTITY
            )));
        }
        Ok(Self { part_id, quantity })
    }
}

/// Merge repeated part ids by summing their quantities, keeping first-seen order.
pub fn merge_part_requests(requests: &[PartRequest]) -> DomainResult<Vec<PartRequest>> {
    let mut merged: Vec<PartRequest> = Vec::with_capacity(requests.len());

    for request in requests {
        let request = PartRequest::new(request.part_id, request.quantity)?;
        match merged.iter_mut().find(|m| m.part_id == request.part_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| DomainError::validation("part quantity is too large"))?;
            }
            None => merged.push(request),
        }
    }

    Ok(merged)
}

/// Drop repeated service ids, keeping first-seen order.
pub fn dedup_service_ids(ids: &[i32]) -> Vec<i32> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

/// Service order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceOrder {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub status: ServiceOrderStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "200.00"))]
    pub estimate: Money,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    /// Move to `target`, stamping execution start and finish on entry.
    pub fn apply_status(
        &mut self,
        target: ServiceOrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Transition> {
        let transition = self.status.transition(target)?;
        if !transition.is_advanced() {
            return Ok(transition);
        }

        match target {
            ServiceOrderStatus::InExecution => self.started_at = Some(now),
            ServiceOrderStatus::Finalized if self.finished_at.is_none() => {
                self.finished_at = Some(now)
            }
            _ => {}
        }

        self.status = target;
        self.updated_at = now;
        Ok(transition)
    }

    /// Fail unless services and parts may still be attached or detached.
    pub fn ensure_editable(&self, operation: &'static str) -> DomainResult<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    /// Fail unless additional repairs may be created or progressed.
    pub fn ensure_accepts_repairs(&self, operation: &'static str) -> DomainResult<()> {
        if self.status.accepts_additional_repairs() {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn state_error(&self, operation: &'static str) -> DomainError {
        DomainError::InvalidOrderState {
            status: self.status.to_string(),
            operation,
        }
    }
}

/// Order together with its lines and additional repairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceOrderDetails {
    #[serde(flatten)]
    pub order: ServiceOrder,
    pub services: Vec<ServiceLine>,
    pub parts: Vec<PartLine>,
    pub additional_repairs: Vec<AdditionalRepair>,
}

impl ServiceOrderDetails {
    /// Estimate implied by the lines and the approved repairs
    pub fn expected_estimate(&self) -> DomainResult<Money> {
        let approved = Money::total(
            self.additional_repairs
                .iter()
                .filter(|r| r.status == RepairStatus::Approved)
                .map(|r| r.estimate_delta),
        )?;
        estimate_of(&self.services, &self.parts)?.checked_add(approved)
    }
}
