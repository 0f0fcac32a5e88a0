use crate::{
    commands::purchaseorders::transition_purchase_order,
    commands::Command,
    db::DbPool,
    entities::purchase_order::{self, PaymentStatus, PurchaseOrderStatus},
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

/// Records a (possibly partial) payment against an invoiced order.
///
/// The order status only advances to Paid once the accumulated payments
/// cover the grand total; partial payments update the payment status alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPaymentCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub amount: Decimal,
}

#[async_trait::async_trait]
impl Command for RecordPaymentCommand {
    type Result = PaymentStatus;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        let db = db_pool.as_ref();

        let current = purchase_order::Entity::find_by_id(self.id)
            .filter(purchase_order::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {}", self.id)))?;

        if current.status != PurchaseOrderStatus::Invoiced {
            return Err(ServiceError::InvalidTransition(format!(
                "Purchase order {} cannot record payment in {:?}",
                self.id, current.status
            )));
        }

        let new_paid = current.amount_paid + self.amount;
        if new_paid > current.grand_total {
            return Err(ServiceError::ValidationError(format!(
                "Payment of {} exceeds outstanding balance of {}",
                self.amount,
                current.grand_total - current.amount_paid
            )));
        }

        let fully_paid = new_paid >= current.grand_total;
        let payment_status = if fully_paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        };

        if fully_paid {
            transition_purchase_order(
                db,
                self.tenant_id,
                self.id,
                PurchaseOrderStatus::Paid,
                vec![
                    (
                        purchase_order::Column::AmountPaid,
                        Expr::value(new_paid),
                    ),
                    (
                        purchase_order::Column::PaymentStatus,
                        Expr::value(PaymentStatus::Paid),
                    ),
                ],
            )
            .await?;
        } else {
            let result = purchase_order::Entity::update_many()
                .col_expr(purchase_order::Column::AmountPaid, Expr::value(new_paid))
                .col_expr(
                    purchase_order::Column::PaymentStatus,
                    Expr::value(PaymentStatus::Partial),
                )
                .col_expr(
                    purchase_order::Column::Version,
                    Expr::col(purchase_order::Column::Version).add(1),
                )
                .col_expr(purchase_order::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(purchase_order::Column::Id.eq(self.id))
                .filter(purchase_order::Column::Version.eq(current.version))
                .exec(db)
                .await?;

            if result.rows_affected == 0 {
                return Err(ServiceError::Conflict(format!(
                    "Purchase order {} was modified concurrently",
                    self.id
                )));
            }
        }

        info!(
            purchase_order_id = %self.id,
            amount = %self.amount,
            ?payment_status,
            "Payment recorded"
        );
        event_sender
            .send(Event::PurchaseOrderPaid {
                purchase_order_id: self.id,
                amount: self.amount,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(payment_status)
    }
}
