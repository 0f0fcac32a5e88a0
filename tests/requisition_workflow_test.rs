mod common;

use rust_decimal_macros::dec;
use supplyline_api::{
    commands::requisitions::{
        ApproveRequisitionCommand, CancelRequisitionCommand, ConvertRequisitionCommand,
        CreateRequisitionCommand, RejectRequisitionCommand, RequisitionLineRequest,
        SubmitRequisitionCommand,
    },
    entities::requisition::{RequisitionPriority, RequisitionStatus},
    errors::ServiceError,
    services::suppliers::CreateSupplierInput,
};
use uuid::Uuid;

fn requisition_input(tenant_id: Uuid, actor_id: Uuid) -> CreateRequisitionCommand {
    CreateRequisitionCommand {
        tenant_id,
        requested_by: actor_id,
        department: "Science".into(),
        priority: RequisitionPriority::Medium,
        required_by: None,
        lines: vec![RequisitionLineRequest {
            description: "Beakers".into(),
            quantity: 10,
            unit: "box".into(),
            estimated_unit_price: dec!(5),
        }],
    }
}

#[tokio::test]
async fn create_computes_line_totals() {
    let app = common::spawn_app().await;

    let result = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();

    assert_eq!(result.total_amount, dec!(50));
    assert!(result.requisition_number.starts_with("REQ-"));

    let (req, lines) = app
        .services
        .requisitions
        .get_requisition(app.tenant_id, result.id)
        .await
        .unwrap();
    assert_eq!(req.status, RequisitionStatus::Draft);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_total, dec!(50));
}

#[tokio::test]
async fn full_approval_path_converts_to_purchase_order() {
    let app = common::spawn_app().await;

    let supplier = app
        .services
        .suppliers
        .create_supplier(
            app.tenant_id,
            CreateSupplierInput {
                name: "Lab Supplies Co".into(),
                registration_number: None,
                tax_id: None,
                contact_email: None,
                contact_phone: None,
                bank_details: None,
            },
        )
        .await
        .unwrap();

    let created = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();

    app.services
        .requisitions
        .submit_requisition(SubmitRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    app.services
        .requisitions
        .approve_requisition(ApproveRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            approver_id: app.actor_id,
            comments: Some("Budget cleared".into()),
        })
        .await
        .unwrap();

    let converted = app
        .services
        .requisitions
        .convert_requisition(ConvertRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            actor_id: app.actor_id,
            supplier_id: supplier.id,
        })
        .await
        .unwrap();

    assert_eq!(converted.total_amount, dec!(50));

    let (po, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, converted.purchase_order_id)
        .await
        .unwrap();
    assert_eq!(po.requisition_id, Some(created.id));
    assert_eq!(po.total_amount, dec!(50));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity_ordered, 10);

    let (req, _) = app
        .services
        .requisitions
        .get_requisition(app.tenant_id, created.id)
        .await
        .unwrap();
    assert_eq!(req.status, RequisitionStatus::Converted);
    assert_eq!(req.converted_po_id, Some(converted.purchase_order_id));

    // A second conversion finds the requisition already Converted.
    let second = app
        .services
        .requisitions
        .convert_requisition(ConvertRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            actor_id: app.actor_id,
            supplier_id: supplier.id,
        })
        .await;
    assert!(matches!(
        second,
        Err(ServiceError::InvalidTransition(_)) | Err(ServiceError::Conflict(_))
    ));
}

#[tokio::test]
async fn rejection_requires_a_comment() {
    let app = common::spawn_app().await;

    let created = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();
    app.services
        .requisitions
        .submit_requisition(SubmitRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let result = app
        .services
        .requisitions
        .reject_requisition(RejectRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            approver_id: app.actor_id,
            comments: "   ".into(),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));

    app.services
        .requisitions
        .reject_requisition(RejectRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            approver_id: app.actor_id,
            comments: "Over budget for this quarter".into(),
        })
        .await
        .unwrap();

    let (req, _) = app
        .services
        .requisitions
        .get_requisition(app.tenant_id, created.id)
        .await
        .unwrap();
    assert_eq!(req.status, RequisitionStatus::Rejected);
}

#[tokio::test]
async fn draft_cannot_be_approved_directly() {
    let app = common::spawn_app().await;

    let created = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();

    let result = app
        .services
        .requisitions
        .approve_requisition(ApproveRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
            approver_id: app.actor_id,
            comments: None,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
}

#[tokio::test]
async fn cancelled_requisition_is_terminal() {
    let app = common::spawn_app().await;

    let created = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();

    app.services
        .requisitions
        .cancel_requisition(CancelRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let result = app
        .services
        .requisitions
        .submit_requisition(SubmitRequisitionCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
}

#[tokio::test]
async fn racing_decisions_leave_exactly_one_winner() {
    let app = common::spawn_app().await;

    // Scheduling decides which decision lands first, so run the race a
    // few times; every run must end with a single committed decision and
    // the loser turned away with Conflict or InvalidTransition.
    for _ in 0..8 {
        let created = app
            .services
            .requisitions
            .create_requisition(requisition_input(app.tenant_id, app.actor_id))
            .await
            .unwrap();
        app.services
            .requisitions
            .submit_requisition(SubmitRequisitionCommand {
                id: created.id,
                tenant_id: app.tenant_id,
            })
            .await
            .unwrap();

        let approve = app
            .services
            .requisitions
            .approve_requisition(ApproveRequisitionCommand {
                id: created.id,
                tenant_id: app.tenant_id,
                approver_id: app.actor_id,
                comments: None,
            });
        let reject = app
            .services
            .requisitions
            .reject_requisition(RejectRequisitionCommand {
                id: created.id,
                tenant_id: app.tenant_id,
                approver_id: app.actor_id,
                comments: "Duplicate of an earlier request".into(),
            });
        let (approved, rejected) = tokio::join!(approve, reject);

        assert!(
            approved.is_ok() != rejected.is_ok(),
            "exactly one decision must win: approve={:?} reject={:?}",
            approved,
            rejected
        );
        let approved_ok = approved.is_ok();
        let loser = if approved_ok {
            rejected.unwrap_err()
        } else {
            approved.unwrap_err()
        };
        assert!(matches!(
            loser,
            ServiceError::Conflict(_) | ServiceError::InvalidTransition(_)
        ));

        let (req, _) = app
            .services
            .requisitions
            .get_requisition(app.tenant_id, created.id)
            .await
            .unwrap();
        let expected = if approved_ok {
            RequisitionStatus::Approved
        } else {
            RequisitionStatus::Rejected
        };
        assert_eq!(req.status, expected);
    }
}

#[tokio::test]
async fn tenants_cannot_see_each_other() {
    let app = common::spawn_app().await;

    let created = app
        .services
        .requisitions
        .create_requisition(requisition_input(app.tenant_id, app.actor_id))
        .await
        .unwrap();

    let other_tenant = Uuid::new_v4();
    let result = app
        .services
        .requisitions
        .get_requisition(other_tenant, created.id)
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
