mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use supplyline_api::{
    entities::supplier::SupplierStatus,
    errors::ServiceError,
    services::suppliers::{CreateSupplierInput, UpdateSupplierInput},
};
use uuid::Uuid;

async fn supplier(app: &TestApp) -> Uuid {
    app.services
        .suppliers
        .create_supplier(
            app.tenant_id,
            CreateSupplierInput {
                name: "Bright Books Ltd".into(),
                registration_number: Some("BRN-2291".into()),
                tax_id: None,
                contact_email: Some("orders@brightbooks.example".into()),
                contact_phone: None,
                bank_details: None,
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn ratings_fold_into_a_rolling_average() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app).await;

    let average = app
        .services
        .suppliers
        .rate_supplier(app.tenant_id, supplier_id, 4, None, app.actor_id)
        .await
        .unwrap();
    assert_eq!(average, dec!(4));

    let average = app
        .services
        .suppliers
        .rate_supplier(
            app.tenant_id,
            supplier_id,
            5,
            Some("Delivered ahead of schedule".into()),
            app.actor_id,
        )
        .await
        .unwrap();
    assert_eq!(average, dec!(4.5));

    let fetched = app
        .services
        .suppliers
        .get_supplier(app.tenant_id, supplier_id)
        .await
        .unwrap();
    assert_eq!(fetched.rating, dec!(4.5));
    assert_eq!(fetched.rating_count, 2);

    let ratings = app
        .services
        .suppliers
        .list_ratings(app.tenant_id, supplier_id)
        .await
        .unwrap();
    assert_eq!(ratings.len(), 2);
}

#[tokio::test]
async fn rating_must_sit_between_one_and_five() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app).await;

    for out_of_range in [0, 6] {
        let result = app
            .services
            .suppliers
            .rate_supplier(app.tenant_id, supplier_id, out_of_range, None, app.actor_id)
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    let fetched = app
        .services
        .suppliers
        .get_supplier(app.tenant_id, supplier_id)
        .await
        .unwrap();
    assert_eq!(fetched.rating_count, 0);
}

#[tokio::test]
async fn new_suppliers_start_active_with_no_ratings() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app).await;

    let fetched = app
        .services
        .suppliers
        .get_supplier(app.tenant_id, supplier_id)
        .await
        .unwrap();
    assert_eq!(fetched.status, SupplierStatus::Active);
    assert_eq!(fetched.rating, dec!(0));
    assert_eq!(fetched.rating_count, 0);
}

#[tokio::test]
async fn update_can_suspend_a_supplier() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app).await;

    let updated = app
        .services
        .suppliers
        .update_supplier(
            app.tenant_id,
            supplier_id,
            UpdateSupplierInput {
                name: None,
                contact_email: None,
                contact_phone: None,
                bank_details: None,
                status: Some(SupplierStatus::Suspended),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, SupplierStatus::Suspended);
}

#[tokio::test]
async fn invalid_contact_email_is_rejected() {
    let app = common::spawn_app().await;

    let result = app
        .services
        .suppliers
        .create_supplier(
            app.tenant_id,
            CreateSupplierInput {
                name: "No Inbox Inc".into(),
                registration_number: None,
                tax_id: None,
                contact_email: Some("not-an-email".into()),
                contact_phone: None,
                bank_details: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}
