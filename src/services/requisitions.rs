use crate::{
    commands::requisitions::{
        ApproveRequisitionCommand, CancelRequisitionCommand, ConvertRequisitionCommand,
        CreateRequisitionCommand, RejectRequisitionCommand, SubmitRequisitionCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{requisition, requisition_line},
    errors::ServiceError,
    events::EventSender,
};
use crate::commands::requisitions::create_requisition_command::CreateRequisitionResult;
use crate::commands::requisitions::convert_requisition_command::ConvertRequisitionResult;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the requisition ledger.
#[derive(Clone)]
pub struct RequisitionService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RequisitionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_requisition(
        &self,
        command: CreateRequisitionCommand,
    ) -> Result<CreateRequisitionResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn submit_requisition(
        &self,
        command: SubmitRequisitionCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn approve_requisition(
        &self,
        command: ApproveRequisitionCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn reject_requisition(
        &self,
        command: RejectRequisitionCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_requisition(
        &self,
        command: CancelRequisitionCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn convert_requisition(
        &self,
        command: ConvertRequisitionCommand,
    ) -> Result<ConvertRequisitionResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_requisition(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(requisition::Model, Vec<requisition_line::Model>), ServiceError> {
        let db = &*self.db_pool;
        let req = requisition::Entity::find_by_id(id)
            .filter(requisition::Column::TenantId.eq(tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Requisition {}", id)))?;
        let lines = requisition_line::Entity::find()
            .filter(requisition_line::Column::RequisitionId.eq(id))
            .all(db)
            .await?;
        Ok((req, lines))
    }

    #[instrument(skip(self))]
    pub async fn list_requisitions(
        &self,
        tenant_id: Uuid,
        status: Option<requisition::RequisitionStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<requisition::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = requisition::Entity::find()
            .filter(requisition::Column::TenantId.eq(tenant_id))
            .order_by_desc(requisition::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(requisition::Column::Status.eq(status));
        }
        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
