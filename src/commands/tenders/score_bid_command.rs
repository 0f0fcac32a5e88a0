use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        bid::{self, FINANCIAL_MAX, TECHNICAL_MAX},
        tender,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Scores a bid after the tender closes.
///
/// Technical and financial marks are capped at their weights (70 and 30);
/// the total is their sum. Re-scoring overwrites the previous marks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBidCommand {
    pub bid_id: Uuid,
    pub tenant_id: Uuid,
    pub technical_score: Decimal,
    pub financial_score: Decimal,
    pub evaluator_comments: Option<String>,
    pub scored_by: Uuid,
}

#[async_trait::async_trait]
impl Command for ScoreBidCommand {
    type Result = Decimal;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.technical_score < Decimal::ZERO
            || self.technical_score > Decimal::from(TECHNICAL_MAX)
        {
            return Err(ServiceError::ValidationError(format!(
                "Technical score must be between 0 and {}",
                TECHNICAL_MAX
            )));
        }
        if self.financial_score < Decimal::ZERO
            || self.financial_score > Decimal::from(FINANCIAL_MAX)
        {
            return Err(ServiceError::ValidationError(format!(
                "Financial score must be between 0 and {}",
                FINANCIAL_MAX
            )));
        }

        let db = db_pool.as_ref();
        let bid = bid::Entity::find_by_id(self.bid_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {}", self.bid_id)))?;

        let tender = tender::Entity::find_by_id(bid.tender_id)
            .filter(tender::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tender {}", bid.tender_id)))?;

        if !tender.is_closed(Utc::now()) {
            return Err(ServiceError::ValidationError(format!(
                "Tender {} is still open for bidding; scoring starts after closing",
                tender.id
            )));
        }

        let total = self.technical_score + self.financial_score;
        bid::Entity::update_many()
            .col_expr(
                bid::Column::TechnicalScore,
                Expr::value(Some(self.technical_score)),
            )
            .col_expr(
                bid::Column::FinancialScore,
                Expr::value(Some(self.financial_score)),
            )
            .col_expr(bid::Column::TotalScore, Expr::value(Some(total)))
            .col_expr(
                bid::Column::EvaluatorComments,
                Expr::value(self.evaluator_comments.clone()),
            )
            .col_expr(bid::Column::ScoredBy, Expr::value(Some(self.scored_by)))
            .filter(bid::Column::Id.eq(self.bid_id))
            .exec(db)
            .await?;

        info!(bid_id = %self.bid_id, total_score = %total, "Bid scored");
        event_sender
            .send(Event::BidScored {
                bid_id: self.bid_id,
                total_score: total,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(total)
    }
}
