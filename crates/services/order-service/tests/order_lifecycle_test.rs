//! Service order lifecycle against a real database.

mod support;

use common::PaginationParams;
use domain::{Money, PartRequest, ServiceOrderStatus};
use order_service_lib::service::ServiceContainer;
use support::{money, workshop, Workshop};

/// Order with service (100.00) and 2 × part (50.00) attached, still RECEIVED.
async fn composed_order(shop: &Workshop) -> (i32, i32) {
    let (customer_id, vehicle_id) = shop.client().await;
    let service_id = shop.service("Brake inspection", "100.00").await;
    let part_id = shop.part("Brake pad", "50.00", 10, 0).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    orders.attach_service(order.order.id, service_id).await.unwrap();
    orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 2 })
        .await
        .unwrap();

    (order.order.id, part_id)
}

async fn drive_to(shop: &Workshop, order_id: i32, target: ServiceOrderStatus) {
    let orders = shop.services.orders();
    let steps = [
        ServiceOrderStatus::InDiagnosis,
        ServiceOrderStatus::AwaitingApproval,
        ServiceOrderStatus::InExecution,
        ServiceOrderStatus::Finalized,
    ];

    for step in steps {
        match step {
            ServiceOrderStatus::InDiagnosis => {
                orders.start_diagnosis(order_id, vec![], vec![]).await.unwrap()
            }
            ServiceOrderStatus::AwaitingApproval => orders.submit_estimate(order_id).await.unwrap(),
            ServiceOrderStatus::InExecution => orders.start_execution(order_id).await.unwrap(),
            _ => orders.finalize(order_id).await.unwrap(),
        };
        if step == target {
            break;
        }
    }
}

#[tokio::test]
async fn test_open_order_starts_received_and_empty() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;

    let order = shop.services.orders().open(customer_id, vehicle_id).await.unwrap();

    assert_eq!(order.order.status, ServiceOrderStatus::Received);
    assert_eq!(order.order.estimate, Money::ZERO);
    assert!(order.services.is_empty());
    assert!(order.parts.is_empty());
    assert!(order.additional_repairs.is_empty());
}

#[tokio::test]
async fn test_happy_path_ends_delivered() {
    let shop = workshop().await;
    let (order_id, part_id) = composed_order(&shop).await;
    assert_eq!(shop.reserved(part_id).await, 2);

    let order = shop.services.orders().get(order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("200.00"));

    drive_to(&shop, order_id, ServiceOrderStatus::Finalized).await;

    let payment = shop
        .services
        .payments()
        .record(order_id, money("200.00"))
        .await
        .unwrap();
    assert_eq!(payment.amount, money("200.00"));
    assert_eq!(payment.service_order_id, order_id);

    let order = shop.services.orders().get(order_id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Delivered);
    assert!(order.order.started_at.is_some());
    assert!(order.order.finished_at.is_some());
    assert_eq!(shop.reserved(part_id).await, 2);

    let fetched = shop.services.payments().get(payment.id).await.unwrap();
    assert_eq!(fetched, payment);
}

#[tokio::test]
async fn test_amount_mismatch_keeps_order_finalized() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::Finalized).await;

    let err = shop
        .services
        .payments()
        .record(order_id, money("199.99"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "AMOUNT_MISMATCH");
    assert_eq!(shop.payment_count().await, 0);
    let order = shop.services.orders().get(order_id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Finalized);
}

#[tokio::test]
async fn test_second_payment_rejected() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::Finalized).await;

    let payments = shop.services.payments();
    payments.record(order_id, money("200.00")).await.unwrap();
    let err = payments.record(order_id, money("200.00")).await.unwrap_err();

    assert_eq!(err.code(), "ALREADY_PAID");
    assert_eq!(shop.payment_count().await, 1);
}

#[tokio::test]
async fn test_payment_requires_finalized_order() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::InExecution).await;

    let err = shop
        .services
        .payments()
        .record(order_id, money("200.00"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "ORDER_NOT_PAYABLE");
    assert_eq!(shop.payment_count().await, 0);
}

#[tokio::test]
async fn test_payment_for_unknown_order() {
    let shop = workshop().await;

    let err = shop
        .services
        .payments()
        .record(404, money("10.00"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.status().as_u16(), 404);
}

#[tokio::test]
async fn test_execution_from_received_is_invalid() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let order = shop.services.orders().open(customer_id, vehicle_id).await.unwrap();

    let err = shop
        .services
        .orders()
        .start_execution(order.order.id)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_TRANSITION");
    let order = shop.services.orders().get(order.order.id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Received);
}

#[tokio::test]
async fn test_repeated_transition_is_noop() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::InExecution).await;

    let orders = shop.services.orders();
    let first = orders.get(order_id).await.unwrap();
    let second = orders.start_execution(order_id).await.unwrap();

    assert_eq!(second.order.status, ServiceOrderStatus::InExecution);
    assert_eq!(second.order.started_at, first.order.started_at);
    assert_eq!(second.order.updated_at, first.order.updated_at);
}

#[tokio::test]
async fn test_diagnosis_attaches_body_items() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let alignment = shop.service("Wheel alignment", "120.00").await;
    let bulb = shop.part("Headlight bulb", "15.50", 8, 0).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let order = orders
        .start_diagnosis(
            order.order.id,
            vec![alignment],
            vec![PartRequest { part_id: bulb, quantity: 2 }],
        )
        .await
        .unwrap();

    assert_eq!(order.order.status, ServiceOrderStatus::InDiagnosis);
    assert_eq!(order.services.len(), 1);
    assert_eq!(order.parts[0].quantity, 2);
    assert_eq!(order.order.estimate, money("151.00"));
    assert_eq!(shop.reserved(bulb).await, 2);
}

#[tokio::test]
async fn test_failed_diagnosis_leaves_no_trace() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let plentiful = shop.part("Spark plug", "20.00", 10, 0).await;
    let scarce = shop.part("Timing belt", "300.00", 1, 1).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let err = orders
        .start_diagnosis(
            order.order.id,
            vec![],
            vec![
                PartRequest { part_id: plentiful, quantity: 4 },
                PartRequest { part_id: scarce, quantity: 1 },
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    assert_eq!(shop.reserved(plentiful).await, 0);
    let order = orders.get(order.order.id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Received);
    assert!(order.parts.is_empty());
}

#[tokio::test]
async fn test_composition_locked_once_executing() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    let extra = shop.service("Car wash", "40.00").await;
    drive_to(&shop, order_id, ServiceOrderStatus::InExecution).await;

    let err = shop
        .services
        .orders()
        .attach_service(order_id, extra)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_ORDER_STATE");
    assert_eq!(err.status().as_u16(), 409);
}

#[tokio::test]
async fn test_detach_part_releases_stock_and_recomputes() {
    let shop = workshop().await;
    let (order_id, part_id) = composed_order(&shop).await;

    let orders = shop.services.orders();
    let line_id = orders.get(order_id).await.unwrap().parts[0].id;
    let order = orders.detach_part(order_id, line_id).await.unwrap();

    assert!(order.parts.is_empty());
    assert_eq!(order.order.estimate, money("100.00"));
    assert_eq!(shop.reserved(part_id).await, 0);

    let service_line = order.services[0].id;
    let order = orders.detach_service(order_id, service_line).await.unwrap();
    assert_eq!(order.order.estimate, Money::ZERO);
}

#[tokio::test]
async fn test_detach_unknown_line() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;

    let err = shop
        .services
        .orders()
        .detach_service(order_id, 9_999)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_estimate_beyond_money_column_rolls_back() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Engine block", "99999999.99", 5, 0).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let err = orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 2 })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
    assert_eq!(err.status().as_u16(), 400);
    assert_eq!(shop.reserved(part_id).await, 0);

    let order = orders.get(order.order.id).await.unwrap();
    assert!(order.parts.is_empty());
    assert_eq!(order.order.estimate, Money::ZERO);

    let order = orders
        .attach_part(order.order.id, PartRequest { part_id, quantity: 1 })
        .await
        .unwrap();
    assert_eq!(order.order.estimate, money("99999999.99"));
}

#[tokio::test]
async fn test_price_snapshot_survives_catalog_changes() {
    let shop = workshop().await;
    let (order_id, _) = composed_order(&shop).await;
    let service_id = shop.services.orders().get(order_id).await.unwrap().services[0].service_id;

    shop.delete_service(service_id).await;

    let order = shop.services.orders().get(order_id).await.unwrap();
    assert_eq!(order.services[0].unit_price, money("100.00"));
    assert_eq!(order.order.estimate, money("200.00"));
}

#[tokio::test]
async fn test_cancel_releases_reservations() {
    let shop = workshop().await;
    let (order_id, part_id) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::AwaitingApproval).await;

    let orders = shop.services.orders();
    let order = orders.cancel(order_id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Cancelled);
    assert_eq!(shop.reserved(part_id).await, 0);

    // A second cancel is a no-op and must not release twice.
    orders.cancel(order_id).await.unwrap();
    assert_eq!(shop.reserved(part_id).await, 0);
}

#[tokio::test]
async fn test_cancel_refused_during_execution() {
    let shop = workshop().await;
    let (order_id, part_id) = composed_order(&shop).await;
    drive_to(&shop, order_id, ServiceOrderStatus::InExecution).await;

    let err = shop.services.orders().cancel(order_id).await.unwrap_err();

    assert_eq!(err.code(), "INVALID_TRANSITION");
    assert_eq!(shop.reserved(part_id).await, 2);
}

#[tokio::test]
async fn test_unknown_and_deleted_references() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let orders = shop.services.orders();

    let err = orders.open(999, vehicle_id).await.unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_REFERENCE");
    let err = orders.open(customer_id, 999).await.unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_REFERENCE");

    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let retired = shop.service("Carburetor tuning", "90.00").await;
    shop.delete_service(retired).await;
    let err = orders.attach_service(order.order.id, retired).await.unwrap_err();
    assert_eq!(err.code(), "SOFT_DELETED");

    let err = orders
        .attach_part(order.order.id, PartRequest { part_id: 999, quantity: 1 })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_REFERENCE");

    shop.delete_customer(customer_id).await;
    let err = orders.open(customer_id, vehicle_id).await.unwrap_err();
    assert_eq!(err.code(), "SOFT_DELETED");
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let orders = shop.services.orders();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(orders.open(customer_id, vehicle_id).await.unwrap().order.id);
    }
    orders.start_diagnosis(ids[0], vec![], vec![]).await.unwrap();

    let page = orders
        .list(None, PaginationParams::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].id, ids[2]);

    let received = orders
        .list(Some(ServiceOrderStatus::Received), PaginationParams::new(1, 20))
        .await
        .unwrap();
    assert_eq!(received.meta.total, 2);
    assert!(received
        .data
        .iter()
        .all(|o| o.status == ServiceOrderStatus::Received));
}
