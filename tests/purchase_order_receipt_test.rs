mod common;

use async_trait::async_trait;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use supplyline_api::{
    commands::purchaseorders::{
        CancelPurchaseOrderCommand, CompletePurchaseOrderCommand, ConfirmPurchaseOrderCommand,
        CreatePurchaseOrderCommand, PurchaseOrderLineRequest, ReceiptLineRequest,
        ReceiveGoodsCommand, RecordInvoiceCommand, RecordPaymentCommand, SendPurchaseOrderCommand,
    },
    entities::purchase_order::{PaymentStatus, PurchaseOrderStatus},
    errors::ServiceError,
    services::payments::{ConfirmationOutcome, PaymentProvider, ProviderStatus},
    services::suppliers::CreateSupplierInput,
    services::warehouses::CreateWarehouseInput,
};
use uuid::Uuid;

struct ConfirmedOrder {
    po_id: Uuid,
    line_id: Uuid,
    warehouse_id: Uuid,
    product_id: Uuid,
}

/// Creates a supplier, a warehouse, and a confirmed order for 10 units.
async fn confirmed_order(app: &TestApp) -> ConfirmedOrder {
    let supplier = app
        .services
        .suppliers
        .create_supplier(
            app.tenant_id,
            CreateSupplierInput {
                name: "Stationery World".into(),
                registration_number: None,
                tax_id: None,
                contact_email: None,
                contact_phone: None,
                bank_details: None,
            },
        )
        .await
        .unwrap();

    let warehouse = app
        .services
        .warehouses
        .create_warehouse(
            app.tenant_id,
            CreateWarehouseInput {
                code: "MAIN".into(),
                name: "Main store".into(),
                location: None,
            },
        )
        .await
        .unwrap();

    let product_id = Uuid::new_v4();
    let created = app
        .services
        .purchase_orders
        .create_purchase_order(CreatePurchaseOrderCommand {
            tenant_id: app.tenant_id,
            created_by: app.actor_id,
            supplier_id: supplier.id,
            lines: vec![PurchaseOrderLineRequest {
                product_id,
                description: "A4 paper".into(),
                quantity: 10,
                unit_price: dec!(3),
            }],
            expected_delivery_date: None,
            tax_amount: dec!(0),
            currency: None,
            notes: None,
        })
        .await
        .unwrap();

    app.services
        .purchase_orders
        .send_purchase_order(SendPurchaseOrderCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();
    app.services
        .purchase_orders
        .confirm_purchase_order(ConfirmPurchaseOrderCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let (_, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, created.id)
        .await
        .unwrap();

    ConfirmedOrder {
        po_id: created.id,
        line_id: lines[0].id,
        warehouse_id: warehouse.id,
        product_id,
    }
}

fn receipt(app: &TestApp, order: &ConfirmedOrder, quantity: i32) -> ReceiveGoodsCommand {
    ReceiveGoodsCommand {
        id: order.po_id,
        tenant_id: app.tenant_id,
        received_by: app.actor_id,
        warehouse_id: order.warehouse_id,
        notes: None,
        lines: vec![ReceiptLineRequest {
            purchase_order_line_id: order.line_id,
            quantity,
        }],
    }
}

#[tokio::test]
async fn full_receipt_marks_order_delivered_and_credits_stock() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    let first = app
        .services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 6))
        .await
        .unwrap();
    assert!(!first.fully_delivered);
    assert_eq!(first.status, PurchaseOrderStatus::PartiallyDelivered);

    let second = app
        .services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 4))
        .await
        .unwrap();
    assert!(second.fully_delivered);
    assert_eq!(second.status, PurchaseOrderStatus::Delivered);

    let (po, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Delivered);
    assert!(po.actual_delivery_date.is_some());
    assert_eq!(lines[0].quantity_received, 10);

    let (stock, _) = app
        .services
        .inventory
        .list_inventory(
            app.tenant_id,
            Some(order.warehouse_id),
            Some(order.product_id),
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(stock.len(), 1);
    assert_eq!(stock[0].quantity, 10);
}

#[tokio::test]
async fn partial_receipts_accumulate() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 3))
        .await
        .unwrap();
    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 4))
        .await
        .unwrap();

    let (po, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::PartiallyDelivered);
    assert_eq!(lines[0].quantity_received, 7);

    let receipts = app
        .services
        .purchase_orders
        .list_goods_receipts(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);
}

#[tokio::test]
async fn over_receipt_is_rejected_without_side_effects() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 8))
        .await
        .unwrap();

    let result = app
        .services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 3))
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));

    let (_, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(lines[0].quantity_received, 8);

    let (stock, _) = app
        .services
        .inventory
        .list_inventory(
            app.tenant_id,
            Some(order.warehouse_id),
            Some(order.product_id),
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(stock[0].quantity, 8);
}

#[tokio::test]
async fn receipt_requires_a_receivable_status() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .cancel_purchase_order(CancelPurchaseOrderCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
            reason: "Supplier out of business".into(),
        })
        .await
        .unwrap();

    let result = app
        .services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 1))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
}

#[tokio::test]
async fn payment_path_tracks_partial_and_full_settlement() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 10))
        .await
        .unwrap();
    app.services
        .purchase_orders
        .record_invoice(RecordInvoiceCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    // Grand total is 30 (10 x 3, no tax).
    let status = app
        .services
        .purchase_orders
        .record_payment(RecordPaymentCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
            amount: dec!(12),
        })
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Partial);

    let status = app
        .services
        .purchase_orders
        .record_payment(RecordPaymentCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
            amount: dec!(18),
        })
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Paid);

    let (po, _) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Paid);
    assert_eq!(po.amount_paid, dec!(30));

    app.services
        .purchase_orders
        .complete_purchase_order(CompletePurchaseOrderCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let (po, _) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Completed);
}

/// Reports the payment as pending on the first poll and settled on the
/// second.
#[derive(Default)]
struct SettlesOnSecondPoll {
    polls: AtomicU32,
}

#[async_trait]
impl PaymentProvider for SettlesOnSecondPoll {
    async fn check_status(
        &self,
        _purchase_order_id: Uuid,
        _amount: Decimal,
    ) -> Result<ProviderStatus, ServiceError> {
        if self.polls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(ProviderStatus::Pending)
        } else {
            Ok(ProviderStatus::Settled)
        }
    }
}

#[tokio::test]
async fn confirmation_job_records_the_payment_once_the_provider_settles() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 10))
        .await
        .unwrap();
    app.services
        .purchase_orders
        .record_invoice(RecordInvoiceCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let provider = Arc::new(SettlesOnSecondPoll::default());
    let outcome = app
        .services
        .payments
        .confirmation_job(provider.clone())
        .confirm(app.tenant_id, order.po_id, dec!(30))
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);
    assert_eq!(provider.polls.load(Ordering::SeqCst), 2);

    let (po, _) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, order.po_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Paid);
    assert_eq!(po.payment_status, PaymentStatus::Paid);
    assert_eq!(po.amount_paid, dec!(30));
}

#[tokio::test]
async fn overpayment_is_rejected() {
    let app = common::spawn_app().await;
    let order = confirmed_order(&app).await;

    app.services
        .purchase_orders
        .receive_goods(receipt(&app, &order, 10))
        .await
        .unwrap();
    app.services
        .purchase_orders
        .record_invoice(RecordInvoiceCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let result = app
        .services
        .purchase_orders
        .record_payment(RecordPaymentCommand {
            id: order.po_id,
            tenant_id: app.tenant_id,
            amount: dec!(31),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}
