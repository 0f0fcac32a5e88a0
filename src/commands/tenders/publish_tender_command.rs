use crate::{
    commands::Command,
    db::DbPool,
    entities::tender::{self, TenderStatus},
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

/// Publishes a draft tender, opening it for bids until its closing date.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishTenderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
}

#[async_trait::async_trait]
impl Command for PublishTenderCommand {
    type Result = ();

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

        if !current.status.can_transition_to(&TenderStatus::Published) {
            return Err(ServiceError::InvalidTransition(format!(
                "Tender {} cannot be published from {:?}",
                self.id, current.status
            )));
        }
        if current.closing_date <= Utc::now() {
            return Err(ServiceError::ValidationError(
                "Cannot publish a tender whose closing date has already passed".to_string(),
            ));
        }

        let result = tender::Entity::update_many()
            .col_expr(
                tender::Column::Status,
                Expr::value(TenderStatus::Published),
            )
            .col_expr(
                tender::Column::Version,
                Expr::col(tender::Column::Version).add(1),
            )
            .col_expr(tender::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(tender::Column::Id.eq(self.id))
            .filter(tender::Column::Status.eq(current.status))
            .filter(tender::Column::Version.eq(current.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Tender {} was modified concurrently",
                self.id
            )));
        }

        info!(tender_id = %self.id, closing_date = %current.closing_date, "Tender published");
        event_sender
            .send(Event::TenderPublished(self.id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
