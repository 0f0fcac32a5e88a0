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
pub struct SubmitRequisitionCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
}

#[async_trait::async_trait]
impl Command for SubmitRequisitionCommand {
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
            .can_transition_to(&RequisitionStatus::Pending)
        {
            return Err(ServiceError::InvalidTransition(format!(
                "Requisition {} cannot be submitted from {:?}",
                self.id, current.status
            )));
        }

        // Conditional update: losing the race after a passing precheck is a
        // concurrency conflict, not a transition error.
        let result = requisition::Entity::update_many()
            .col_expr(
                requisition::Column::Status,
                Expr::value(RequisitionStatus::Pending),
            )
            .col_expr(
                requisition::Column::Version,
                Expr::col(requisition::Column::Version).add(1),
            )
            .col_expr(requisition::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(requisition::Column::Id.eq(self.id))
            .filter(requisition::Column::Status.eq(RequisitionStatus::Draft))
            .filter(requisition::Column::Version.eq(current.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Requisition {} was modified concurrently",
                self.id
            )));
        }

        info!(requisition_id = %self.id, "Requisition submitted for approval");
        event_sender
            .send(Event::RequisitionSubmitted(self.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
