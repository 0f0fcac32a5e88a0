use crate::{
    commands::Command,
    db::DbPool,
    entities::{bid, supplier, tender},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Submits a supplier bid against a published tender.
///
/// Acceptance is judged against the closing date at submission time, so a
/// bid against a Published tender whose deadline has lapsed is rejected
/// even before any sweep marks the tender Closed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitBidCommand {
    pub tender_id: Uuid,
    pub tenant_id: Uuid,
    pub supplier_id: Uuid,
    pub total_amount: Decimal,
    #[validate(range(min = 1, max = 365))]
    pub validity_days: i32,
    pub proposal_document: Option<String>,
}

#[async_trait::async_trait]
impl Command for SubmitBidCommand {
    type Result = bid::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        if self.total_amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Bid amount must be positive".to_string(),
            ));
        }

        let db = db_pool.as_ref();
        let tender = tender::Entity::find_by_id(self.tender_id)
            .filter(tender::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tender {}", self.tender_id)))?;

        let now = Utc::now();
        if !tender.accepts_bids(now) {
            return Err(ServiceError::ValidationError(format!(
                "Tender {} is not accepting bids",
                self.tender_id
            )));
        }

        supplier::Entity::find_by_id(self.supplier_id)
            .filter(supplier::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {}", self.supplier_id)))?;

        let existing = bid::Entity::find()
            .filter(bid::Column::TenderId.eq(self.tender_id))
            .filter(bid::Column::SupplierId.eq(self.supplier_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Supplier {} already bid on tender {}",
                self.supplier_id, self.tender_id
            )));
        }

        let model = bid::Model {
            id: Uuid::new_v4(),
            tender_id: self.tender_id,
            supplier_id: self.supplier_id,
            total_amount: self.total_amount,
            validity_days: self.validity_days,
            proposal_document: self.proposal_document.clone(),
            submitted_at: now,
            technical_score: None,
            financial_score: None,
            total_score: None,
            evaluator_comments: None,
            scored_by: None,
            created_at: now,
        };

        bid::Entity::insert(bid::ActiveModel {
            id: Set(model.id),
            tender_id: Set(model.tender_id),
            supplier_id: Set(model.supplier_id),
            total_amount: Set(model.total_amount),
            validity_days: Set(model.validity_days),
            proposal_document: Set(model.proposal_document.clone()),
            submitted_at: Set(model.submitted_at),
            technical_score: Set(None),
            financial_score: Set(None),
            total_score: Set(None),
            evaluator_comments: Set(None),
            scored_by: Set(None),
            created_at: Set(model.created_at),
        })
        .exec(db)
        .await?;

        info!(tender_id = %self.tender_id, bid_id = %model.id, "Bid submitted");
        event_sender
            .send(Event::BidSubmitted {
                tender_id: self.tender_id,
                bid_id: model.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }
}
