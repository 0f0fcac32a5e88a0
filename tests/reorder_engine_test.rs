mod common;

use chrono::Utc;
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use supplyline_api::{
    commands::inventory::AdjustInventoryCommand,
    entities::inventory_record::{self, StockCondition},
    entities::requisition::RequisitionStatus,
    errors::ServiceError,
    services::reordering::CreateReorderRuleInput,
};
use uuid::Uuid;

async fn seed_stock(
    app: &TestApp,
    product_id: Uuid,
    warehouse_id: Uuid,
    quantity: i32,
) -> inventory_record::Model {
    let now = Utc::now();
    inventory_record::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(app.tenant_id),
        product_id: Set(product_id),
        warehouse_id: Set(warehouse_id),
        quantity: Set(quantity),
        reserved_quantity: Set(0),
        reorder_level: Set(10),
        max_stock_level: Set(50),
        unit_cost: Set(dec!(4)),
        condition: Set(StockCondition::Good),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&*app.db)
    .await
    .unwrap()
}

fn rule_input(product_id: Uuid, warehouse_id: Uuid, auto_approve: bool) -> CreateReorderRuleInput {
    CreateReorderRuleInput {
        product_id,
        warehouse_id,
        min_stock_level: 10,
        max_stock_level: 50,
        reorder_quantity: 0,
        auto_approve,
    }
}

#[tokio::test]
async fn low_stock_raises_a_fill_to_max_requisition() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();
    seed_stock(&app, product_id, warehouse_id, 8).await;

    let rule = app
        .services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await
        .unwrap();

    let actions = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule_id, rule.id);
    // reorder_quantity 0 means fill back up to max: 50 - 8.
    assert_eq!(actions[0].reorder_quantity, 42);
    assert!(!actions[0].auto_approved);

    let (req, lines) = app
        .services
        .requisitions
        .get_requisition(app.tenant_id, actions[0].requisition_id)
        .await
        .unwrap();
    assert_eq!(req.status, RequisitionStatus::Draft);
    assert_eq!(req.department, "Automated Reordering");
    assert_eq!(lines[0].quantity, 42);
    assert_eq!(lines[0].estimated_unit_price, dec!(4));
}

#[tokio::test]
async fn sweep_is_idempotent_over_unchanged_stock() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();
    let record = seed_stock(&app, product_id, warehouse_id, 8).await;

    app.services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await
        .unwrap();

    let first = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert_eq!(first.len(), 1);

    let second = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert!(second.is_empty());

    // A fresh stock movement re-arms the rule.
    app.services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: record.id,
            tenant_id: app.tenant_id,
            delta: -2,
            reason: "Issued to front office".into(),
            adjusted_by: app.actor_id,
        })
        .await
        .unwrap();

    let third = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].reorder_quantity, 44);
}

#[tokio::test]
async fn healthy_stock_does_not_fire() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();
    seed_stock(&app, product_id, warehouse_id, 30).await;

    app.services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await
        .unwrap();

    let actions = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn auto_approve_rules_land_requisitions_in_approved() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();
    seed_stock(&app, product_id, warehouse_id, 3).await;

    app.services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, true))
        .await
        .unwrap();

    let actions = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].auto_approved);

    let (req, _) = app
        .services
        .requisitions
        .get_requisition(app.tenant_id, actions[0].requisition_id)
        .await
        .unwrap();
    assert_eq!(req.status, RequisitionStatus::Approved);
    assert_eq!(req.approved_by, Some(Uuid::nil()));
}

#[tokio::test]
async fn deactivated_rules_are_skipped() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();
    seed_stock(&app, product_id, warehouse_id, 2).await;

    let rule = app
        .services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await
        .unwrap();
    app.services
        .reordering
        .deactivate_rule(app.tenant_id, rule.id)
        .await
        .unwrap();

    let actions = app.services.reordering.run_check(app.tenant_id).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn rule_validation_rejects_inverted_thresholds_and_duplicates() {
    let app = common::spawn_app().await;
    let product_id = Uuid::new_v4();
    let warehouse_id = Uuid::new_v4();

    let inverted = app
        .services
        .reordering
        .create_rule(
            app.tenant_id,
            CreateReorderRuleInput {
                product_id,
                warehouse_id,
                min_stock_level: 50,
                max_stock_level: 10,
                reorder_quantity: 0,
                auto_approve: false,
            },
        )
        .await;
    assert!(matches!(inverted, Err(ServiceError::ValidationError(_))));

    app.services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await
        .unwrap();
    let duplicate = app
        .services
        .reordering
        .create_rule(app.tenant_id, rule_input(product_id, warehouse_id, false))
        .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
}
