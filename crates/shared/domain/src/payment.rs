//! Payment that closes a service order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::order::ServiceOrder;
use crate::status::ServiceOrderStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Payment {
    pub id: i32,
    pub service_order_id: i32,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "200.00"))]
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
}

/// Check whether `amount` may close `order`.
///
/// An existing payment is reported first, then the order status, then the
/// amount, which must equal the estimate exactly.
pub fn ensure_payable(order: &ServiceOrder, already_paid: bool, amount: Money) -> DomainResult<()> {
    if already_paid {
        return Err(DomainError::AlreadyPaid(order.id));
    }
    if order.status != ServiceOrderStatus::Finalized {
        return Err(DomainError::OrderNotPayable(order.status.to_string()));
    }
    if amount != order.estimate {
        return Err(DomainError::AmountMismatch {
            expected: order.estimate,
            received: amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalized(estimate: &str) -> ServiceOrder {
        let now = Utc::now();
        ServiceOrder {
            id: 9,
            customer_id: 1,
            vehicle_id: 1,
            status: ServiceOrderStatus::Finalized,
            estimate: estimate.parse().unwrap(),
            started_at: Some(now),
            finished_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_exact_amount_accepted() {
        let order = finalized("200.00");
        assert!(ensure_payable(&order, false, "200".parse().unwrap()).is_ok());
    }

    #[test]
    fn test_off_by_a_cent_rejected() {
        let order = finalized("200.00");
        let err = ensure_payable(&order, false, "199.99".parse().unwrap()).unwrap_err();
        assert_eq!(err.code(), "AMOUNT_MISMATCH");
        assert_eq!(
            err.to_string(),
            "payment amount 199.99 does not match estimate 200.00"
        );
    }

    #[test]
    fn test_only_finalized_orders_are_payable() {
        let mut order = finalized("0.00");
        order.status = ServiceOrderStatus::InExecution;
        let err = ensure_payable(&order, false, Money::ZERO).unwrap_err();
        assert_eq!(err, DomainError::OrderNotPayable("IN_EXECUTION".to_string()));
    }

    #[test]
    fn test_second_payment_reports_already_paid() {
        let mut order = finalized("200.00");
        order.status = ServiceOrderStatus::Delivered;
        let err = ensure_payable(&order, true, "200.00".parse().unwrap()).unwrap_err();
        assert_eq!(err.code(), "ALREADY_PAID");
    }
}
