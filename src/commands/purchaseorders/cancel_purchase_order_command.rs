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

/// Cancels an order from any non-terminal state. The reason is mandatory
/// and retained on the row for the audit trail.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelPurchaseOrderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub reason: String,
}

#[async_trait::async_trait]
impl Command for CancelPurchaseOrderCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Cancellation requires a non-empty reason".to_string(),
            ));
        }

        transition_purchase_order(
            db_pool.as_ref(),
            self.tenant_id,
            self.id,
            PurchaseOrderStatus::Cancelled,
            vec![(
                purchase_order::Column::CancellationReason,
                Expr::value(Some(self.reason.clone())),
            )],
        )
        .await?;

        info!(purchase_order_id = %self.id, reason = %self.reason, "Purchase order cancelled");
        event_sender
            .send(Event::PurchaseOrderCancelled {
                purchase_order_id: self.id,
                reason: self.reason.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
