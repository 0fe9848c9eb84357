//! Catalog gateway: the read-and-reserve view of services, parts, customers
//! and vehicles that the order engine consumes.
//!
//! The relational implementation is [`crate::repository::TxCatalog`], whose
//! reservations run inside the caller's transaction.

use async_trait::async_trait;

use common::AppResult;
use domain::catalog::ensure_active;
use domain::{CatalogPart, CatalogService, Customer, PartRequest, ReferenceKind, Vehicle};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog gateway trait.
///
/// Lookups fail with `UnknownReference` when the id does not exist and return
/// soft-deleted records with `deleted = true`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn lookup_service(&self, id: i32) -> AppResult<CatalogService>;

    async fn lookup_part(&self, id: i32) -> AppResult<CatalogPart>;

    /// Atomically add `quantity` to the reserved count; `InsufficientStock` otherwise
    async fn reserve_part(&self, id: i32, quantity: u32) -> AppResult<()>;

    /// Atomically subtract `quantity` from the reserved count
    async fn release_part(&self, id: i32, quantity: u32) -> AppResult<()>;

    async fn lookup_customer(&self, id: i32) -> AppResult<Customer>;

    async fn lookup_vehicle(&self, id: i32) -> AppResult<Vehicle>;
}

/// Resolve a service that can be attached.
pub async fn active_service<C>(catalog: &C, id: i32) -> AppResult<CatalogService>
where
    C: CatalogGateway + ?Sized,
{
    let service = catalog.lookup_service(id).await?;
    ensure_active(ReferenceKind::Service, id, service.deleted)?;
    Ok(service)
}

/// Resolve an attachable part and reserve `request.quantity` units of it.
///
/// Returns the part as read before the reservation, for its price snapshot.
pub async fn reserve_stock<C>(catalog: &C, request: PartRequest) -> AppResult<CatalogPart>
where
    C: CatalogGateway + ?Sized,
{
    let request = PartRequest::new(request.part_id, request.quantity)?;
    let part = catalog.lookup_part(request.part_id).await?;
    ensure_active(ReferenceKind::Part, part.id, part.deleted)?;
    part.ensure_available(request.quantity)?;

    catalog.reserve_part(part.id, request.quantity).await?;
    Ok(part)
}

/// Give back reserved units.
pub async fn release_stock<C>(catalog: &C, released: &[PartRequest]) -> AppResult<()>
where
    C: CatalogGateway + ?Sized,
{
    for request in released {
        catalog.release_part(request.part_id, request.quantity).await?;
    }
    Ok(())
}

/// Require an existing, active customer.
pub async fn ensure_customer<C>(catalog: &C, id: i32) -> AppResult<Customer>
where
    C: CatalogGateway + ?Sized,
{
    let customer = catalog.lookup_customer(id).await?;
    ensure_active(ReferenceKind::Customer, id, customer.deleted)?;
    Ok(customer)
}

/// Require an existing, active vehicle.
pub async fn ensure_vehicle<C>(catalog: &C, id: i32) -> AppResult<Vehicle>
where
    C: CatalogGateway + ?Sized,
{
    let vehicle = catalog.lookup_vehicle(id).await?;
    ensure_active(ReferenceKind::Vehicle, id, vehicle.deleted)?;
    Ok(vehicle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::DomainError;
    use mockall::predicate::eq;

    fn part(total: u32, reserved: u32, deleted: bool) -> CatalogPart {
        CatalogPart {
            id: 4,
            name: "oil filter".to_string(),
            price: "30.00".parse().unwrap(),
            quantity_total: total,
            quantity_reserved: reserved,
            deleted,
        }
    }

    #[tokio::test]
    async fn test_reserve_stock_reserves_requested_units() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_lookup_part()
            .with(eq(4))
            .returning(|_| Ok(part(10, 3, false)));
        catalog
            .expect_reserve_part()
            .with(eq(4), eq(2))
            .times(1)
            .returning(|_, _| Ok(()));

        let reserved = reserve_stock(&catalog, PartRequest { part_id: 4, quantity: 2 })
            .await
            .unwrap();
        assert_eq!(reserved.price.to_string(), "30.00");
    }

    #[tokio::test]
    async fn test_insufficient_stock_never_reserves() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_lookup_part()
            .returning(|_| Ok(part(3, 2, false)));
        catalog.expect_reserve_part().never();

        let err = reserve_stock(&catalog, PartRequest { part_id: 4, quantity: 2 })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    }

    #[tokio::test]
    async fn test_soft_deleted_part_rejected() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_lookup_part()
            .returning(|_| Ok(part(10, 0, true)));
        catalog.expect_reserve_part().never();

        let err = reserve_stock(&catalog, PartRequest { part_id: 4, quantity: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SOFT_DELETED");
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_lookup() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_lookup_part().never();

        let err = reserve_stock(&catalog, PartRequest { part_id: 4, quantity: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_service_propagates() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_lookup_service()
            .returning(|id| Err(DomainError::unknown(ReferenceKind::Service, id).into()));

        let err = active_service(&catalog, 77).await.unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_REFERENCE");
        assert_eq!(err.user_message(), "unknown service 77");
    }

    #[tokio::test]
    async fn test_deleted_vehicle_rejected() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_lookup_vehicle().returning(|id| {
            Ok(Vehicle {
                id,
                customer_id: 1,
                plate: "ABC1D23".to_string(),
                deleted: true,
            })
        });

        let err = ensure_vehicle(&catalog, 5).await.unwrap_err();
        assert_eq!(err.code(), "SOFT_DELETED");
    }

    #[tokio::test]
    async fn test_release_stock_releases_each_part() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_release_part()
            .with(eq(1), eq(2))
            .times(1)
            .returning(|_, _| Ok(()));
        catalog
            .expect_release_part()
            .with(eq(9), eq(1))
            .times(1)
            .returning(|_, _| Ok(()));

        release_stock(
            &catalog,
            &[
                PartRequest { part_id: 1, quantity: 2 },
                PartRequest { part_id: 9, quantity: 1 },
            ],
        )
        .await
        .unwrap();
    }
}
