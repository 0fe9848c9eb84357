//! Additional repair approval flow against a real database.

mod support;

use domain::{PartRequest, RepairDecision, RepairItems, RepairStatus, ServiceOrderStatus};
use order_service_lib::service::{NewAdditionalRepair, ServiceContainer};
use support::{money, workshop, Workshop};

struct Fixture {
    shop: Workshop,
    order_id: i32,
    extra_service: i32,
    extra_part: i32,
}

/// Order worth 200.00 in IN_EXECUTION, plus a catalog service (80.00) and a
/// part (30.00, 5 in stock) that are not on the order yet.
async fn executing_order() -> Fixture {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let service_id = shop.service("Clutch replacement", "100.00").await;
    let part_id = shop.part("Clutch disc", "50.00", 10, 0).await;
    let extra_service = shop.service("Gearbox oil change", "80.00").await;
    let extra_part = shop.part("Gearbox oil", "30.00", 5, 0).await;

    let orders = shop.services.orders();
    let order = orders
        .open(customer_id, vehicle_id)
        .await
        .unwrap();
    let order_id = order.order.id;
    orders
        .start_diagnosis(order_id, vec![service_id], vec![PartRequest { part_id, quantity: 2 }])
        .await
        .unwrap();
    orders.submit_estimate(order_id).await.unwrap();
    let order = orders.start_execution(order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("200.00"));

    Fixture {
        shop,
        order_id,
        extra_service,
        extra_part,
    }
}

fn new_repair(fixture: &Fixture) -> NewAdditionalRepair {
    NewAdditionalRepair {
        service_order_id: fixture.order_id,
        description: "  Gearbox leaking oil  ".to_string(),
        service_ids: vec![fixture.extra_service],
        parts: vec![PartRequest { part_id: fixture.extra_part, quantity: 1 }],
    }
}

#[tokio::test]
async fn test_created_repair_reserves_without_touching_estimate() {
    let fx = executing_order().await;

    let repair = fx.shop.services.repairs().create(new_repair(&fx)).await.unwrap();

    assert_eq!(repair.status, RepairStatus::InAnalysis);
    assert_eq!(repair.description, "Gearbox leaking oil");
    assert_eq!(repair.estimate_delta, money("110.00"));
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 1);

    let order = fx.shop.services.orders().get(fx.order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("200.00"));
    assert_eq!(order.additional_repairs.len(), 1);
    assert_eq!(order.additional_repairs[0].id, repair.id);
    assert_eq!(order.additional_repairs[0].estimate_delta, repair.estimate_delta);
}

#[tokio::test]
async fn test_approved_repair_raises_estimate() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();

    let repair = repairs.create(new_repair(&fx)).await.unwrap();
    repairs.submit(repair.id).await.unwrap();
    let repair = repairs.decide(repair.id, RepairDecision::Approved).await.unwrap();

    assert_eq!(repair.status, RepairStatus::Approved);
    let order = fx.shop.services.orders().get(fx.order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("310.00"));
    assert_eq!(order.order.estimate, order.expected_estimate().unwrap());
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 1);
}

#[tokio::test]
async fn test_rejected_repair_releases_stock() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let before = fx.shop.reserved(fx.extra_part).await;

    let repair = repairs.create(new_repair(&fx)).await.unwrap();
    repairs.submit(repair.id).await.unwrap();
    let repair = repairs.decide(repair.id, RepairDecision::Rejected).await.unwrap();

    assert_eq!(repair.status, RepairStatus::Rejected);
    assert!(repair.services.is_empty());
    assert!(repair.parts.is_empty());
    assert_eq!(repair.estimate_delta, money("0.00"));
    assert_eq!(fx.shop.reserved(fx.extra_part).await, before);

    let order = fx.shop.services.orders().get(fx.order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("200.00"));
}

#[tokio::test]
async fn test_repeated_decision_is_noop_and_reversal_refused() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();

    let repair = repairs.create(new_repair(&fx)).await.unwrap();
    repairs.submit(repair.id).await.unwrap();
    repairs.decide(repair.id, RepairDecision::Approved).await.unwrap();
    repairs.decide(repair.id, RepairDecision::Approved).await.unwrap();

    let order = fx.shop.services.orders().get(fx.order_id).await.unwrap();
    assert_eq!(order.order.estimate, money("310.00"));

    let err = repairs
        .decide(repair.id, RepairDecision::Rejected)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_decision_requires_submission() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let repair = repairs.create(new_repair(&fx)).await.unwrap();

    let err = repairs
        .decide(repair.id, RepairDecision::Approved)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_modify_items_adds_and_removes() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let repair = repairs.create(new_repair(&fx)).await.unwrap();

    let add = RepairItems {
        service_ids: vec![fx.extra_service],
        parts: vec![PartRequest { part_id: fx.extra_part, quantity: 2 }],
    };
    let repair = repairs
        .modify_items(repair.id, add, RepairItems::default())
        .await
        .unwrap();

    assert_eq!(repair.services.len(), 1);
    assert_eq!(repair.parts.len(), 1);
    assert_eq!(repair.parts[0].quantity, 3);
    assert_eq!(repair.estimate_delta, money("170.00"));
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 3);

    let remove = RepairItems {
        service_ids: vec![fx.extra_service],
        parts: vec![PartRequest { part_id: fx.extra_part, quantity: 1 }],
    };
    let repair = repairs
        .modify_items(repair.id, RepairItems::default(), remove)
        .await
        .unwrap();

    assert!(repair.services.is_empty());
    assert_eq!(repair.parts[0].quantity, 2);
    assert_eq!(repair.estimate_delta, money("60.00"));
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 2);

    let stored = repairs.get(repair.id).await.unwrap();
    assert_eq!(stored.parts, repair.parts);
    assert_eq!(stored.estimate_delta, money("60.00"));
}

#[tokio::test]
async fn test_removing_absent_item_is_invalid() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let repair = repairs.create(new_repair(&fx)).await.unwrap();

    let remove = RepairItems {
        service_ids: vec![],
        parts: vec![PartRequest { part_id: fx.extra_part, quantity: 5 }],
    };
    let err = repairs
        .modify_items(repair.id, RepairItems::default(), remove)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 1);
}

#[tokio::test]
async fn test_submitted_repair_is_frozen() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let repair = repairs.create(new_repair(&fx)).await.unwrap();
    repairs.submit(repair.id).await.unwrap();

    let add = RepairItems {
        service_ids: vec![],
        parts: vec![PartRequest { part_id: fx.extra_part, quantity: 1 }],
    };
    let err = repairs
        .modify_items(repair.id, add, RepairItems::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_REPAIR_STATE");
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 1);
}

#[tokio::test]
async fn test_repair_needs_diagnosed_order() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let order = shop.services.orders().open(customer_id, vehicle_id).await.unwrap();

    let err = shop
        .services
        .repairs()
        .create(NewAdditionalRepair {
            service_order_id: order.order.id,
            description: "Noise in suspension".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_ORDER_STATE");
}

#[tokio::test]
async fn test_repair_stock_counts_against_orders() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();

    let mut greedy = new_repair(&fx);
    greedy.service_ids.clear();
    greedy.parts = vec![PartRequest { part_id: fx.extra_part, quantity: 5 }];
    repairs.create(greedy).await.unwrap();

    let err = repairs.create(new_repair(&fx)).await.unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 5);
}

#[tokio::test]
async fn test_blank_description_rejected() {
    let fx = executing_order().await;
    let mut repair = new_repair(&fx);
    repair.description = "   ".to_string();

    let err = fx.shop.services.repairs().create(repair).await.unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
    assert_eq!(fx.shop.reserved(fx.extra_part).await, 0);
}

#[tokio::test]
async fn test_finalize_waits_for_decisions() {
    let fx = executing_order().await;
    let repairs = fx.shop.services.repairs();
    let orders = fx.shop.services.orders();
    let repair = repairs.create(new_repair(&fx)).await.unwrap();

    let err = orders.finalize(fx.order_id).await.unwrap_err();
    assert_eq!(err.code(), "PENDING_ADDITIONAL_REPAIRS");

    repairs.submit(repair.id).await.unwrap();
    repairs.decide(repair.id, RepairDecision::Approved).await.unwrap();
    let order = orders.finalize(fx.order_id).await.unwrap();
    assert_eq!(order.order.status, ServiceOrderStatus::Finalized);

    let payment = fx
        .shop
        .services
        .payments()
        .record(fx.order_id, money("310.00"))
        .await
        .unwrap();
    assert_eq!(payment.amount, money("310.00"));
}

#[tokio::test]
async fn test_cancel_releases_repair_stock() {
    let shop = workshop().await;
    let (customer_id, vehicle_id) = shop.client().await;
    let part_id = shop.part("Radiator hose", "45.00", 6, 0).await;

    let orders = shop.services.orders();
    let order = orders.open(customer_id, vehicle_id).await.unwrap();
    let order_id = order.order.id;
    orders
        .start_diagnosis(order_id, vec![], vec![PartRequest { part_id, quantity: 1 }])
        .await
        .unwrap();
    shop.services
        .repairs()
        .create(NewAdditionalRepair {
            service_order_id: order_id,
            description: "Second hose cracked".to_string(),
            service_ids: vec![],
            parts: vec![PartRequest { part_id, quantity: 2 }],
        })
        .await
        .unwrap();
    assert_eq!(shop.reserved(part_id).await, 3);

    orders.cancel(order_id).await.unwrap();
    assert_eq!(shop.reserved(part_id).await, 0);
}
