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
pub struct ApprovePurchaseOrderCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub approver_id: Uuid,
}

#[async_trait::async_trait]
impl Command for ApprovePurchaseOrderCommand {
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
            PurchaseOrderStatus::Approved,
            vec![(
                purchase_order::Column::ApprovedBy,
                Expr::value(Some(self.approver_id)),
            )],
        )
        .await?;

        info!(purchase_order_id = %self.id, approver_id = %self.approver_id, "Purchase order approved");
        event_sender
            .send(Event::PurchaseOrderApproved(self.id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
