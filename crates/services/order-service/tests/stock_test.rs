//! Part reservations across orders and repairs.

mod support;

use domain::{PartRequest, RepairDecision};
use order_service_lib::service::{NewAdditionalRepair, ServiceContainer};
use support::workshop;

#[tokio::test]
async fn test_insufficient_stock_leaves_reservation_unchanged() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Alternator", "420.00", 3, 2).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let err = orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 2 })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(shop.reserved(part_id).await, 2);

    let order = orders.get(order.order.id).await.unwrap();
    assert!(order.parts.is_empty());
    assert!(order.order.estimate.amount().is_zero());
}

#[tokio::test]
async fn test_zero_quantity_is_invalid_input() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Fuse", "2.50", 100, 0).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let err = orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 0 })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
    assert_eq!(err.status().as_u16(), 400);
}

#[tokio::test]
async fn test_deleted_part_cannot_be_reserved() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Distributor cap", "35.00", 4, 0).await;
    shop.delete_part(part_id).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let err = orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 1 })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "SOFT_DELETED");
    assert_eq!(shop.reserved(part_id).await, 0);
}

#[tokio::test]
async fn test_reserved_equals_sum_of_live_lines() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Wiper blade", "25.00", 20, 0).await;
    let orders = shop.services.orders();
    let repairs = shop.services.repairs();

    let first = orders.open(customer_id, vehicle_id).await.unwrap().order.id;
    let second = orders.open(customer_id, vehicle_id).await.unwrap().order.id;
    let third = orders.open(customer_id, vehicle_id).await.unwrap().order.id;

    orders
        .attach_part(first, PartRequest { part_id, quantity: 3 })
        .await
        .unwrap();
    orders
        .start_diagnosis(second, vec![], vec![PartRequest { part_id, quantity: 4 }])
        .await
        .unwrap();
    orders
        .attach_part(third, PartRequest { part_id, quantity: 5 })
        .await
        .unwrap();

    let kept = repairs
        .create(NewAdditionalRepair {
            service_order_id: second,
            description: "Rear wiper too".to_string(),
            service_ids: vec![],
            parts: vec![PartRequest { part_id, quantity: 2 }],
        })
        .await
        .unwrap();
    let dropped = repairs
        .create(NewAdditionalRepair {
            service_order_id: second,
            description: "Spare set".to_string(),
            service_ids: vec![],
            parts: vec![PartRequest { part_id, quantity: 6 }],
        })
        .await
        .unwrap();
    assert_eq!(shop.reserved(part_id).await, 20);

    repairs.submit(dropped.id).await.unwrap();
    repairs.decide(dropped.id, RepairDecision::Rejected).await.unwrap();
    orders.cancel(third).await.unwrap();

    // first: 3, second: 4 + repair 2
    assert_eq!(shop.reserved(part_id).await, 9);
    let second_order = orders.get(second).await.unwrap();
    assert_eq!(second_order.additional_repairs[0].id, kept.id);
    assert_eq!(second_order.additional_repairs[0].parts[0].quantity, 2);
    assert!(second_order.additional_repairs[1].parts.is_empty());
}
