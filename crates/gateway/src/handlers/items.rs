//! Catalog items carried in request bodies.

use std::borrow::Cow;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use domain::{PartRequest, RepairItems};

/// Quantity of a catalog part
#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct PartItem {
    #[validate(range(min = 1, message = "part_id must be a positive id"))]
    #[schema(example = 7)]
    pub part_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: u32,
}

impl From<PartItem> for PartRequest {
    fn from(item: PartItem) -> Self {
        PartRequest {
            part_id: item.part_id,
            quantity: item.quantity,
        }
    }
}

/// Services and parts to attach, add or remove
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ItemsRequest {
    #[serde(default)]
    #[validate(custom(function = "positive_ids"))]
    #[schema(example = json!([3]))]
    pub service_ids: Vec<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub parts: Vec<PartItem>,
}

impl ItemsRequest {
    pub fn part_requests(&self) -> Vec<PartRequest> {
        self.parts.iter().copied().map(PartRequest::from).collect()
    }
}

impl From<ItemsRequest> for RepairItems {
    fn from(items: ItemsRequest) -> Self {
        RepairItems {
            parts: items.part_requests(),
            service_ids: items.service_ids,
        }
    }
}

/// Every id in the list must be positive.
pub fn positive_ids(ids: &[i32]) -> Result<(), ValidationError> {
    if ids.iter().all(|id| *id >= 1) {
        return Ok(());
    }
    Err(ValidationError::new("range")
        .with_message(Cow::Borrowed("service_ids must be positive ids")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_ids_rejected() {
        let items = ItemsRequest {
            service_ids: vec![3, 0],
            parts: Vec::new(),
        };
        assert!(items.validate().is_err());

        let items = ItemsRequest {
            service_ids: vec![3],
            parts: vec![PartItem { part_id: -2, quantity: 1 }],
        };
        assert!(items.validate().is_err());

        let items = ItemsRequest {
            service_ids: vec![3],
            parts: vec![PartItem { part_id: 7, quantity: 2 }],
        };
        assert!(items.validate().is_ok());
    }
}
