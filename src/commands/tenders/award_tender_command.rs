use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        bid, purchase_order,
        purchase_order::{PaymentStatus, PurchaseOrderStatus},
        purchase_order_line,
        tender::{self, TenderStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Awards a closed tender to a winning bid and opens the follow-on draft
/// purchase order for the winning supplier in the same transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct AwardTenderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub winning_bid_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AwardTenderResult {
    pub tender_id: Uuid,
    pub winning_bid_id: Uuid,
    pub purchase_order_id: Uuid,
    pub po_number: String,
}

#[async_trait::async_trait]
impl Command for AwardTenderCommand {
    type Result = AwardTenderResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let current = tender::Entity::find_by_id(self.id)
            .filter(tender::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tender {}", self.id)))?;

        if !current.status.can_transition_to(&TenderStatus::Awarded) {
            return Err(ServiceError::InvalidTransition(format!(
                "Tender {} cannot be awarded from {:?}",
                self.id, current.status
            )));
        }
        if !current.is_closed(Utc::now()) {
            return Err(ServiceError::ValidationError(format!(
                "Tender {} is still accepting bids; award after closing",
                self.id
            )));
        }

        let winning_bid = bid::Entity::find_by_id(self.winning_bid_id)
            .filter(bid::Column::TenderId.eq(self.id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Bid {} on tender {}",
                    self.winning_bid_id, self.id
                ))
            })?;

        if winning_bid.total_score.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "Bid {} has not been scored",
                self.winning_bid_id
            )));
        }

        let po_id = Uuid::new_v4();
        let po_number = format!("PO-{}", Uuid::new_v4().simple());
        let tender_id = self.id;
        let tenant_id = self.tenant_id;
        let bid_id = self.winning_bid_id;
        let actor_id = self.actor_id;
        let expected_status = current.status;
        let expected_version = current.version;
        let title = current.title.clone();
        let amount = winning_bid.total_amount;
        let supplier_id = winning_bid.supplier_id;
        let number = po_number.clone();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let awarded = tender::Entity::update_many()
                    .col_expr(tender::Column::Status, Expr::value(TenderStatus::Awarded))
                    .col_expr(tender::Column::AwardedBidId, Expr::value(Some(bid_id)))
                    .col_expr(
                        tender::Column::Version,
                        Expr::col(tender::Column::Version).add(1),
                    )
                    .col_expr(tender::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(tender::Column::Id.eq(tender_id))
                    .filter(tender::Column::Status.eq(expected_status))
                    .filter(tender::Column::Version.eq(expected_version))
                    .exec(txn)
                    .await?;

                if awarded.rows_affected == 0 {
                    return Err(ServiceError::Conflict(format!(
                        "Tender {} was awarded or modified concurrently",
                        tender_id
                    )));
                }

                let now = Utc::now();
                purchase_order::ActiveModel {
                    id: Set(po_id),
                    tenant_id: Set(tenant_id),
                    po_number: Set(number),
                    supplier_id: Set(supplier_id),
                    requisition_id: Set(None),
                    tender_id: Set(Some(tender_id)),
                    status: Set(PurchaseOrderStatus::Draft),
                    payment_status: Set(PaymentStatus::Pending),
                    order_date: Set(now),
                    expected_delivery_date: Set(None),
                    actual_delivery_date: Set(None),
                    total_amount: Set(amount),
                    tax_amount: Set(Decimal::ZERO),
                    grand_total: Set(amount),
                    amount_paid: Set(Decimal::ZERO),
                    currency: Set("USD".to_string()),
                    notes: Set(None),
                    cancellation_reason: Set(None),
                    created_by: Set(actor_id),
                    approved_by: Set(None),
                    version: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await?;

                // The award covers the whole tendered scope, so the order
                // carries a single line priced at the winning bid total.
                purchase_order_line::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    purchase_order_id: Set(po_id),
                    product_id: Set(tender_id),
                    description: Set(title),
                    quantity_ordered: Set(1),
                    quantity_received: Set(0),
                    unit_price: Set(amount),
                    line_total: Set(amount),
                    created_at: Set(now),
                }
                .insert(txn)
                .await?;

                Ok(())
            })
        })
        .await?;

        info!(
            tender_id = %self.id,
            winning_bid_id = %self.winning_bid_id,
            purchase_order_id = %po_id,
            "Tender awarded"
        );
        event_sender
            .send(Event::TenderAwarded {
                tender_id: self.id,
                winning_bid_id: self.winning_bid_id,
                purchase_order_id: po_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(AwardTenderResult {
            tender_id: self.id,
            winning_bid_id: self.winning_bid_id,
            purchase_order_id: po_id,
            po_number,
        })
    }
}
