use crate::{
    commands::Command,
    db::DbPool,
    entities::{inventory_record, stock_adjustment},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

lazy_static! {
    static ref INVENTORY_ADJUSTMENTS: IntCounter = IntCounter::new(
        "inventory_adjustments_total",
        "Total number of manual inventory adjustments"
    )
    .expect("metric can be created");
}

/// Applies a signed quantity delta to an inventory record.
///
/// Negative deltas are bounded by the current on-hand quantity; a delta
/// that would drive stock below zero fails without touching the row. Every
/// adjustment writes an audit row with its mandatory reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustInventoryCommand {
    pub inventory_id: Uuid,
    pub tenant_id: Uuid,
    pub delta: i32,
    pub reason: String,
    pub adjusted_by: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AdjustInventoryResult {
    pub inventory_id: Uuid,
    pub old_quantity: i32,
    pub new_quantity: i32,
}

#[async_trait::async_trait]
impl Command for AdjustInventoryCommand {
    type Result = AdjustInventoryResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.delta == 0 {
            return Err(ServiceError::ValidationError(
                "Adjustment delta must be non-zero".to_string(),
            ));
        }
        if self.reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Adjustment requires a non-empty reason".to_string(),
            ));
        }

        let cmd = self.clone();
        let result = db_pool
            .transaction::<_, AdjustInventoryResult, ServiceError>(|txn| {
                Box::pin(async move {
                    let record = inventory_record::Entity::find_by_id(cmd.inventory_id)
                        .filter(inventory_record::Column::TenantId.eq(cmd.tenant_id))
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Inventory record {}",
                                cmd.inventory_id
                            ))
                        })?;

                    let now = Utc::now();
                    let mut update = inventory_record::Entity::update_many()
                        .col_expr(
                            inventory_record::Column::Quantity,
                            Expr::col(inventory_record::Column::Quantity).add(cmd.delta),
                        )
                        .col_expr(inventory_record::Column::UpdatedAt, Expr::value(now))
                        .filter(inventory_record::Column::Id.eq(cmd.inventory_id));
                    if cmd.delta < 0 {
                        // The floor check rides on the UPDATE itself so a
                        // concurrent drain cannot slip stock below zero.
                        update =
                            update.filter(inventory_record::Column::Quantity.gte(-cmd.delta));
                    }
                    let updated = update.exec(txn).await?;

                    if updated.rows_affected == 0 {
                        warn!(
                            inventory_id = %cmd.inventory_id,
                            delta = cmd.delta,
                            on_hand = record.quantity,
                            "Adjustment rejected, would drive stock negative"
                        );
                        return Err(ServiceError::InsufficientStock(format!(
                            "Cannot adjust inventory {} by {}: only {} on hand",
                            cmd.inventory_id, cmd.delta, record.quantity
                        )));
                    }

                    stock_adjustment::Entity::insert(stock_adjustment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        inventory_id: Set(cmd.inventory_id),
                        delta_quantity: Set(cmd.delta),
                        reason: Set(cmd.reason.clone()),
                        adjusted_by: Set(cmd.adjusted_by),
                        created_at: Set(now),
                    })
                    .exec(txn)
                    .await?;

                    Ok(AdjustInventoryResult {
                        inventory_id: cmd.inventory_id,
                        old_quantity: record.quantity,
                        new_quantity: record.quantity + cmd.delta,
                    })
                })
            })
            .await?;

        INVENTORY_ADJUSTMENTS.inc();
        info!(
            inventory_id = %self.inventory_id,
            old_quantity = result.old_quantity,
            new_quantity = result.new_quantity,
            "Inventory adjusted"
        );
        event_sender
            .send(Event::InventoryAdjusted {
                inventory_id: self.inventory_id,
                old_quantity: result.old_quantity,
                new_quantity: result.new_quantity,
                reason: self.reason.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(result)
    }
}
