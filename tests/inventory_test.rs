mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use supplyline_api::{
    commands::inventory::{AdjustInventoryCommand, TransferInventoryCommand},
    entities::inventory_record::{self, StockCondition},
    errors::ServiceError,
};
use uuid::Uuid;

async fn seed_record(
    app: &TestApp,
    product_id: Uuid,
    warehouse_id: Uuid,
    quantity: i32,
    reorder_level: i32,
) -> inventory_record::Model {
    let now = Utc::now();
    inventory_record::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(app.tenant_id),
        product_id: Set(product_id),
        warehouse_id: Set(warehouse_id),
        quantity: Set(quantity),
        reserved_quantity: Set(0),
        reorder_level: Set(reorder_level),
        max_stock_level: Set(100),
        unit_cost: Set(dec!(2.50)),
        condition: Set(StockCondition::Good),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&*app.db)
    .await
    .unwrap()
}

#[tokio::test]
async fn adjustment_applies_delta_and_keeps_an_audit_trail() {
    let app = common::spawn_app().await;
    let record = seed_record(&app, Uuid::new_v4(), Uuid::new_v4(), 20, 5).await;

    let result = app
        .services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: record.id,
            tenant_id: app.tenant_id,
            delta: -6,
            reason: "Breakage during stocktake".into(),
            adjusted_by: app.actor_id,
        })
        .await
        .unwrap();
    assert_eq!(result.old_quantity, 20);
    assert_eq!(result.new_quantity, 14);

    let fetched = app
        .services
        .inventory
        .get_inventory_record(app.tenant_id, record.id)
        .await
        .unwrap();
    assert_eq!(fetched.quantity, 14);

    let adjustments = app
        .services
        .inventory
        .list_adjustments(app.tenant_id, record.id)
        .await
        .unwrap();
    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].delta_quantity, -6);
    assert_eq!(adjustments[0].reason, "Breakage during stocktake");
}

#[tokio::test]
async fn adjustment_cannot_drive_stock_negative() {
    let app = common::spawn_app().await;
    let record = seed_record(&app, Uuid::new_v4(), Uuid::new_v4(), 5, 0).await;

    let result = app
        .services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: record.id,
            tenant_id: app.tenant_id,
            delta: -6,
            reason: "Write-off".into(),
            adjusted_by: app.actor_id,
        })
        .await;
    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    let fetched = app
        .services
        .inventory
        .get_inventory_record(app.tenant_id, record.id)
        .await
        .unwrap();
    assert_eq!(fetched.quantity, 5);

    // The rejected adjustment leaves no audit row either.
    let adjustments = app
        .services
        .inventory
        .list_adjustments(app.tenant_id, record.id)
        .await
        .unwrap();
    assert!(adjustments.is_empty());
}

#[tokio::test]
async fn adjustment_requires_a_reason_and_nonzero_delta() {
    let app = common::spawn_app().await;
    let record = seed_record(&app, Uuid::new_v4(), Uuid::new_v4(), 5, 0).await;

    let missing_reason = app
        .services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: record.id,
            tenant_id: app.tenant_id,
            delta: 1,
            reason: "  ".into(),
            adjusted_by: app.actor_id,
        })
        .await;
    assert_matches!(missing_reason, Err(ServiceError::ValidationError(_)));

    let zero_delta = app
        .services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: record.id,
            tenant_id: app.tenant_id,
            delta: 0,
            reason: "No-op".into(),
            adjusted_by: app.actor_id,
        })
        .await;
    assert_matches!(zero_delta, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn transfer_moves_stock_between_warehouses() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let from = Uuid::new_v4();
    let to = Uuid::new_v4();
    let source = seed_record(&app, product_id, from, 15, 5).await;

    app.services
        .inventory
        .transfer_inventory(TransferInventoryCommand {
            tenant_id: app.tenant_id,
            product_id,
            from_warehouse_id: from,
            to_warehouse_id: to,
            quantity: 10,
        })
        .await
        .unwrap();

    let fetched = app
        .services
        .inventory
        .get_inventory_record(app.tenant_id, source.id)
        .await
        .unwrap();
    assert_eq!(fetched.quantity, 5);

    let (destination, _) = app
        .services
        .inventory
        .list_inventory(app.tenant_id, Some(to), Some(product_id), 1, 10)
        .await
        .unwrap();
    assert_eq!(destination.len(), 1);
    assert_eq!(destination[0].quantity, 10);
    // The new record inherits the source's thresholds and cost.
    assert_eq!(destination[0].reorder_level, source.reorder_level);
    assert_eq!(destination[0].unit_cost, source.unit_cost);
}

#[tokio::test]
async fn short_transfer_leaves_both_warehouses_untouched() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let from = Uuid::new_v4();
    let to = Uuid::new_v4();
    let source = seed_record(&app, product_id, from, 15, 5).await;

    let result = app
        .services
        .inventory
        .transfer_inventory(TransferInventoryCommand {
            tenant_id: app.tenant_id,
            product_id,
            from_warehouse_id: from,
            to_warehouse_id: to,
            quantity: 20,
        })
        .await;
    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    let fetched = app
        .services
        .inventory
        .get_inventory_record(app.tenant_id, source.id)
        .await
        .unwrap();
    assert_eq!(fetched.quantity, 15);

    let (destination, _) = app
        .services
        .inventory
        .list_inventory(app.tenant_id, Some(to), Some(product_id), 1, 10)
        .await
        .unwrap();
    assert!(destination.is_empty());
}

#[tokio::test]
async fn transfer_to_the_same_warehouse_is_rejected() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse = Uuid::new_v4();
    seed_record(&app, product_id, warehouse, 15, 5).await;

    let result = app
        .services
        .inventory
        .transfer_inventory(TransferInventoryCommand {
            tenant_id: app.tenant_id,
            product_id,
            from_warehouse_id: warehouse,
            to_warehouse_id: warehouse,
            quantity: 5,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn low_and_out_of_stock_are_live_views() {
    let app = common::spawn_app().await;
    let warehouse = Uuid::new_v4();
    let healthy = seed_record(&app, Uuid::new_v4(), warehouse, 50, 10).await;
    let low = seed_record(&app, Uuid::new_v4(), warehouse, 8, 10).await;
    let empty = seed_record(&app, Uuid::new_v4(), warehouse, 0, 10).await;

    let low_stock = app
        .services
        .inventory
        .list_low_stock(app.tenant_id)
        .await
        .unwrap();
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0].id, low.id);

    let out_of_stock = app
        .services
        .inventory
        .list_out_of_stock(app.tenant_id)
        .await
        .unwrap();
    assert_eq!(out_of_stock.len(), 1);
    assert_eq!(out_of_stock[0].id, empty.id);

    // Draining the healthy record moves it straight into the low list.
    app.services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: healthy.id,
            tenant_id: app.tenant_id,
            delta: -45,
            reason: "Term start issue to classrooms".into(),
            adjusted_by: app.actor_id,
        })
        .await
        .unwrap();

    let low_stock = app
        .services
        .inventory
        .list_low_stock(app.tenant_id)
        .await
        .unwrap();
    assert_eq!(low_stock.len(), 2);
}
