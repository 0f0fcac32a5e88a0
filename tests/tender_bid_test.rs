mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use supplyline_api::{
    commands::tenders::{
        AwardTenderCommand, CreateTenderCommand, PublishTenderCommand, ScoreBidCommand,
        SubmitBidCommand,
    },
    entities::purchase_order::PurchaseOrderStatus,
    entities::tender::{self, TenderStatus, TenderType},
    errors::ServiceError,
    services::suppliers::CreateSupplierInput,
};
use uuid::Uuid;

async fn supplier(app: &TestApp, name: &str) -> Uuid {
    app.services
        .suppliers
        .create_supplier(
            app.tenant_id,
            CreateSupplierInput {
                name: name.into(),
                registration_number: None,
                tax_id: None,
                contact_email: None,
                contact_phone: None,
                bank_details: None,
            },
        )
        .await
        .unwrap()
        .id
}

async fn published_tender(app: &TestApp) -> tender::Model {
    let created = app
        .services
        .tenders
        .create_tender(CreateTenderCommand {
            tenant_id: app.tenant_id,
            title: "Annual stationery supply".into(),
            description: None,
            tender_type: TenderType::Open,
            category: Some("Supplies".into()),
            opening_date: Utc::now(),
            closing_date: Utc::now() + Duration::hours(2),
            budget: Some(dec!(10000)),
        })
        .await
        .unwrap();
    app.services
        .tenders
        .publish_tender(PublishTenderCommand {
            id: created.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();
    created
}

/// Moves the closing date into the past so the bidding window is over.
async fn pass_closing_date(app: &TestApp, tender_id: Uuid) {
    tender::Entity::update_many()
        .col_expr(
            tender::Column::ClosingDate,
            Expr::value(Utc::now() - Duration::hours(1)),
        )
        .filter(tender::Column::Id.eq(tender_id))
        .exec(&*app.db)
        .await
        .unwrap();
}

fn bid(app: &TestApp, tender_id: Uuid, supplier_id: Uuid, amount: rust_decimal::Decimal) -> SubmitBidCommand {
    SubmitBidCommand {
        tender_id,
        tenant_id: app.tenant_id,
        supplier_id,
        total_amount: amount,
        validity_days: 90,
        proposal_document: None,
    }
}

#[tokio::test]
async fn bids_are_accepted_only_while_published_and_open() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app, "Paper Plus").await;

    let draft = app
        .services
        .tenders
        .create_tender(CreateTenderCommand {
            tenant_id: app.tenant_id,
            title: "Lab equipment".into(),
            description: None,
            tender_type: TenderType::Rfq,
            category: None,
            opening_date: Utc::now(),
            closing_date: Utc::now() + Duration::hours(2),
            budget: None,
        })
        .await
        .unwrap();
    assert_eq!(draft.status, TenderStatus::Draft);

    // Unpublished tenders take no bids.
    let early = app
        .services
        .tenders
        .submit_bid(bid(&app, draft.id, supplier_id, dec!(900)))
        .await;
    assert!(matches!(early, Err(ServiceError::ValidationError(_))));

    app.services
        .tenders
        .publish_tender(PublishTenderCommand {
            id: draft.id,
            tenant_id: app.tenant_id,
        })
        .await
        .unwrap();

    let submitted = app
        .services
        .tenders
        .submit_bid(bid(&app, draft.id, supplier_id, dec!(900)))
        .await
        .unwrap();
    assert_eq!(submitted.total_amount, dec!(900));
    assert!(submitted.total_score.is_none());

    // One bid per supplier per tender.
    let duplicate = app
        .services
        .tenders
        .submit_bid(bid(&app, draft.id, supplier_id, dec!(850)))
        .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    pass_closing_date(&app, draft.id).await;
    let late_supplier = supplier(&app, "Late Bird Supplies").await;
    let late = app
        .services
        .tenders
        .submit_bid(bid(&app, draft.id, late_supplier, dec!(800)))
        .await;
    assert!(matches!(late, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn scoring_waits_for_the_closing_date() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app, "Desk Depot").await;
    let tender = published_tender(&app).await;
    let submitted = app
        .services
        .tenders
        .submit_bid(bid(&app, tender.id, supplier_id, dec!(5000)))
        .await
        .unwrap();

    let premature = app
        .services
        .tenders
        .score_bid(ScoreBidCommand {
            bid_id: submitted.id,
            tenant_id: app.tenant_id,
            technical_score: dec!(60),
            financial_score: dec!(25),
            evaluator_comments: None,
            scored_by: app.actor_id,
        })
        .await;
    assert!(matches!(premature, Err(ServiceError::ValidationError(_))));

    pass_closing_date(&app, tender.id).await;

    // Scores are capped at 70 technical / 30 financial.
    let over_cap = app
        .services
        .tenders
        .score_bid(ScoreBidCommand {
            bid_id: submitted.id,
            tenant_id: app.tenant_id,
            technical_score: dec!(71),
            financial_score: dec!(25),
            evaluator_comments: None,
            scored_by: app.actor_id,
        })
        .await;
    assert!(matches!(over_cap, Err(ServiceError::ValidationError(_))));

    let total = app
        .services
        .tenders
        .score_bid(ScoreBidCommand {
            bid_id: submitted.id,
            tenant_id: app.tenant_id,
            technical_score: dec!(60),
            financial_score: dec!(25),
            evaluator_comments: Some("Strong technical proposal".into()),
            scored_by: app.actor_id,
        })
        .await
        .unwrap();
    assert_eq!(total, dec!(85));

    let bids = app
        .services
        .tenders
        .list_bids(app.tenant_id, tender.id)
        .await
        .unwrap();
    assert_eq!(bids[0].total_score, Some(dec!(85)));
    assert_eq!(bids[0].scored_by, Some(app.actor_id));
}

#[tokio::test]
async fn award_creates_a_draft_purchase_order_from_the_winning_bid() {
    let app = common::spawn_app().await;
    let cheap = supplier(&app, "Budget Supplies").await;
    let strong = supplier(&app, "Quality Supplies").await;
    let tender = published_tender(&app).await;

    let cheap_bid = app
        .services
        .tenders
        .submit_bid(bid(&app, tender.id, cheap, dec!(4000)))
        .await
        .unwrap();
    let strong_bid = app
        .services
        .tenders
        .submit_bid(bid(&app, tender.id, strong, dec!(4500)))
        .await
        .unwrap();

    // Unscored bids cannot win, even after closing.
    pass_closing_date(&app, tender.id).await;
    let unscored = app
        .services
        .tenders
        .award_tender(AwardTenderCommand {
            id: tender.id,
            tenant_id: app.tenant_id,
            winning_bid_id: strong_bid.id,
            actor_id: app.actor_id,
        })
        .await;
    assert!(matches!(unscored, Err(ServiceError::ValidationError(_))));

    for (bid_id, technical, financial) in [
        (cheap_bid.id, dec!(40), dec!(30)),
        (strong_bid.id, dec!(65), dec!(27)),
    ] {
        app.services
            .tenders
            .score_bid(ScoreBidCommand {
                bid_id,
                tenant_id: app.tenant_id,
                technical_score: technical,
                financial_score: financial,
                evaluator_comments: None,
                scored_by: app.actor_id,
            })
            .await
            .unwrap();
    }

    let award = app
        .services
        .tenders
        .award_tender(AwardTenderCommand {
            id: tender.id,
            tenant_id: app.tenant_id,
            winning_bid_id: strong_bid.id,
            actor_id: app.actor_id,
        })
        .await
        .unwrap();
    assert_eq!(award.winning_bid_id, strong_bid.id);
    assert!(award.po_number.starts_with("PO-"));

    let awarded = app
        .services
        .tenders
        .get_tender(app.tenant_id, tender.id)
        .await
        .unwrap();
    assert_eq!(awarded.status, TenderStatus::Awarded);
    assert_eq!(awarded.awarded_bid_id, Some(strong_bid.id));

    let (po, lines) = app
        .services
        .purchase_orders
        .get_purchase_order(app.tenant_id, award.purchase_order_id)
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Draft);
    assert_eq!(po.tender_id, Some(tender.id));
    assert_eq!(po.supplier_id, strong);
    assert_eq!(po.grand_total, dec!(4500));
    assert_eq!(lines.len(), 1);

    // A tender is awarded at most once.
    let second = app
        .services
        .tenders
        .award_tender(AwardTenderCommand {
            id: tender.id,
            tenant_id: app.tenant_id,
            winning_bid_id: cheap_bid.id,
            actor_id: app.actor_id,
        })
        .await;
    assert!(matches!(
        second,
        Err(ServiceError::InvalidTransition(_)) | Err(ServiceError::Conflict(_))
    ));
}

#[tokio::test]
async fn award_requires_the_bidding_window_to_be_over() {
    let app = common::spawn_app().await;
    let supplier_id = supplier(&app, "Open Window Co").await;
    let tender = published_tender(&app).await;
    let submitted = app
        .services
        .tenders
        .submit_bid(bid(&app, tender.id, supplier_id, dec!(1000)))
        .await
        .unwrap();

    let result = app
        .services
        .tenders
        .award_tender(AwardTenderCommand {
            id: tender.id,
            tenant_id: app.tenant_id,
            winning_bid_id: submitted.id,
            actor_id: app.actor_id,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn closing_date_must_follow_opening_date() {
    let app = common::spawn_app().await;

    let result = app
        .services
        .tenders
        .create_tender(CreateTenderCommand {
            tenant_id: app.tenant_id,
            title: "Backwards window".into(),
            description: None,
            tender_type: TenderType::Open,
            category: None,
            opening_date: Utc::now(),
            closing_date: Utc::now() - Duration::hours(1),
            budget: None,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn open_tender_listing_drops_closed_tenders() {
    let app = common::spawn_app().await;
    let open = published_tender(&app).await;
    let closed = published_tender(&app).await;
    pass_closing_date(&app, closed.id).await;

    let listed = app
        .services
        .tenders
        .list_open_tenders(app.tenant_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, open.id);
}
