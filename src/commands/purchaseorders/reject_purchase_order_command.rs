use crate::{
    commands::purchaseorders::transition_purchase_order,
    commands::Command,
    db::DbPool,
    entities::purchase_order::{self, PurchaseOrderStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct RejectPurchaseOrderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub rejector_id: Uuid,
    pub reason: String,
}

#[async_trait::async_trait]
impl Command for RejectPurchaseOrderCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Rejection requires a non-empty reason".to_string(),
            ));
        }

        transition_purchase_order(
            db_pool.as_ref(),
            self.tenant_id,
            self.id,
            PurchaseOrderStatus::Rejected,
            vec![(
                purchase_order::Column::Notes,
                Expr::value(Some(self.reason.clone())),
            )],
        )
        .await?;

        info!(purchase_order_id = %self.id, "Purchase order rejected");
        event_sender
            .send(Event::PurchaseOrderRejected(self.id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
