use crate::{
    commands::Command,
    db::DbPool,
    entities::requisition::{self, RequisitionStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveRequisitionCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub approver_id: Uuid,
    pub comments: Option<String>,
}

#[async_trait::async_trait]
impl Command for ApproveRequisitionCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let current = requisition::Entity::find_by_id(self.id)
            .filter(requisition::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Requisition {}", self.id)))?;

        if !current
            .status
            .can_transition_to(&RequisitionStatus::Approved)
        {
            return Err(ServiceError::InvalidTransition(format!(
                "Requisition {} cannot be approved from {:?}",
                self.id, current.status
            )));
        }

        // Single-writer rule: two approvers racing on the same Pending
        // requisition resolve here, exactly one update wins.
        let result = requisition::Entity::update_many()
            .col_expr(
                requisition::Column::Status,
                Expr::value(RequisitionStatus::Approved),
            )
            .col_expr(
                requisition::Column::ApprovedBy,
                Expr::value(Some(self.approver_id)),
            )
            .col_expr(
                requisition::Column::ApprovalComments,
                Expr::value(self.comments.clone()),
            )
            .col_expr(
                requisition::Column::Version,
                Expr::col(requisition::Column::Version).add(1),
            )
            .col_expr(requisition::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(requisition::Column::Id.eq(self.id))
            .filter(requisition::Column::Status.eq(RequisitionStatus::Pending))
            .filter(requisition::Column::Version.eq(current.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Requisition {} was decided by another approver",
                self.id
            )));
        }

        info!(requisition_id = %self.id, approver_id = %self.approver_id, "Requisition approved");
        event_sender
            .send(Event::RequisitionApproved(self.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
