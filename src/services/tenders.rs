use crate::{
    commands::tenders::{
        AwardTenderCommand, AwardTenderResult, CreateTenderCommand, PublishTenderCommand,
        ScoreBidCommand, SubmitBidCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{
        bid,
        tender::{self, TenderStatus},
    },
    errors::ServiceError,
    events::EventSender,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the tender and bid workflow.
#[derive(Clone)]
pub struct TenderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl TenderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_tender(
        &self,
        command: CreateTenderCommand,
    ) -> Result<tender::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn publish_tender(&self, command: PublishTenderCommand) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn submit_bid(&self, command: SubmitBidCommand) -> Result<bid::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn score_bid(&self, command: ScoreBidCommand) -> Result<Decimal, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn award_tender(
        &self,
        command: AwardTenderCommand,
    ) -> Result<AwardTenderResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_tender(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<tender::Model, ServiceError> {
        tender::Entity::find_by_id(id)
            .filter(tender::Column::TenantId.eq(tenant_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tender {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_tenders(
        &self,
        tenant_id: Uuid,
        status: Option<TenderStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<tender::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = tender::Entity::find()
            .filter(tender::Column::TenantId.eq(tenant_id))
            .order_by_desc(tender::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(tender::Column::Status.eq(status));
        }
        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Published tenders still open for bids; the supplier-facing listing.
    #[instrument(skip(self))]
    pub async fn list_open_tenders(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<tender::Model>, ServiceError> {
        tender::Entity::find()
            .filter(tender::Column::TenantId.eq(tenant_id))
            .filter(tender::Column::Status.eq(TenderStatus::Published))
            .filter(tender::Column::ClosingDate.gte(Utc::now()))
            .order_by_asc(tender::Column::ClosingDate)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Bids on a tender, highest score first, unscored last.
    #[instrument(skip(self))]
    pub async fn list_bids(
        &self,
        tenant_id: Uuid,
        tender_id: Uuid,
    ) -> Result<Vec<bid::Model>, ServiceError> {
        self.get_tender(tenant_id, tender_id).await?;
        let mut bids = bid::Entity::find()
            .filter(bid::Column::TenderId.eq(tender_id))
            .order_by_asc(bid::Column::SubmittedAt)
            .all(&*self.db_pool)
            .await?;
        bids.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        Ok(bids)
    }
}
