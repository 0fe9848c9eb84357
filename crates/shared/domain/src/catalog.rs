//! Catalog records resolved by the order engine: services, parts, customers
//! and vehicles. They are maintained elsewhere; the engine only reads them and
//! moves the reserved counter of parts.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, ReferenceKind};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: i32,
    pub name: String,
    pub price: Money,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPart {
    pub id: i32,
    pub name: String,
    pub price: Money,
    pub quantity_total: u32,
    pub quantity_reserved: u32,
    pub deleted: bool,
}

impl CatalogPart {
    /// Units not yet reserved
    pub fn available(&self) -> u32 {
        self.quantity_total.saturating_sub(self.quantity_reserved)
    }

    /// Fail with `InsufficientStock` when `quantity` exceeds free stock.
    pub fn ensure_available(&self, quantity: u32) -> DomainResult<()> {
        if quantity > self.available() {
            return Err(DomainError::InsufficientStock {
                part_id: self.id,
                requested: quantity,
                available: self.available(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i32,
    pub customer_id: i32,
    pub plate: String,
    pub deleted: bool,
}

/// Reject a soft-deleted reference.
pub fn ensure_active(kind: ReferenceKind, id: i32, deleted: bool) -> DomainResult<()> {
    if deleted {
        Err(DomainError::SoftDeleted { kind, id })
    } else {
        Ok(())
    }
}
