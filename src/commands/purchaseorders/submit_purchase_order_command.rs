use crate::{
    commands::purchaseorders::transition_purchase_order,
    commands::Command,
    db::DbPool,
    entities::purchase_order::PurchaseOrderStatus,
    errors::ServiceError,
    events::{Event, EventSender},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitPurchaseOrderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
}

#[async_trait::async_trait]
impl Command for SubmitPurchaseOrderCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        transition_purchase_order(
            db_pool.as_ref(),
            self.tenant_id,
            self.id,
            PurchaseOrderStatus::PendingApproval,
            vec![],
        )
        .await?;

        info!(purchase_order_id = %self.id, "Purchase order submitted for approval");
        event_sender
            .send(Event::PurchaseOrderSubmitted(self.id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
