use crate::{
    commands::Command,
    db::DbPool,
    entities::inventory_record::{self, StockCondition},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Moves stock of one product between two warehouses atomically.
///
/// The debit and credit commit together or not at all: if the source lacks
/// the requested quantity the transaction rolls back and both warehouses
/// keep their prior quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInventoryCommand {
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    pub quantity: i32,
}

#[async_trait::async_trait]
impl Command for TransferInventoryCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Transfer quantity must be positive".to_string(),
            ));
        }
        if self.from_warehouse_id == self.to_warehouse_id {
            return Err(ServiceError::ValidationError(
                "Source and destination warehouses must differ".to_string(),
            ));
        }

        let cmd = self.clone();
        db_pool
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let source = inventory_record::Entity::find()
                        .filter(inventory_record::Column::TenantId.eq(cmd.tenant_id))
                        .filter(inventory_record::Column::ProductId.eq(cmd.product_id))
                        .filter(inventory_record::Column::WarehouseId.eq(cmd.from_warehouse_id))
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "No stock of product {} at warehouse {}",
                                cmd.product_id, cmd.from_warehouse_id
                            ))
                        })?;

                    let now = Utc::now();
                    // Debit with the floor check on the UPDATE so a racing
                    // drain rolls the whole transfer back.
                    let debited = inventory_record::Entity::update_many()
                        .col_expr(
                            inventory_record::Column::Quantity,
                            Expr::col(inventory_record::Column::Quantity).sub(cmd.quantity),
                        )
                        .col_expr(inventory_record::Column::UpdatedAt, Expr::value(now))
                        .filter(inventory_record::Column::Id.eq(source.id))
                        .filter(inventory_record::Column::Quantity.gte(cmd.quantity))
                        .exec(txn)
                        .await?;

                    if debited.rows_affected == 0 {
                        return Err(ServiceError::InsufficientStock(format!(
                            "Cannot transfer {} of product {}: only {} on hand at source",
                            cmd.quantity, cmd.product_id, source.quantity
                        )));
                    }

                    let destination = inventory_record::Entity::find()
                        .filter(inventory_record::Column::TenantId.eq(cmd.tenant_id))
                        .filter(inventory_record::Column::ProductId.eq(cmd.product_id))
                        .filter(inventory_record::Column::WarehouseId.eq(cmd.to_warehouse_id))
                        .one(txn)
                        .await?;

                    match destination {
                        Some(record) => {
                            inventory_record::Entity::update_many()
                                .col_expr(
                                    inventory_record::Column::Quantity,
                                    Expr::col(inventory_record::Column::Quantity)
                                        .add(cmd.quantity),
                                )
                                .col_expr(
                                    inventory_record::Column::UpdatedAt,
                                    Expr::value(now),
                                )
                                .filter(inventory_record::Column::Id.eq(record.id))
                                .exec(txn)
                                .await?;
                        }
                        None => {
                            inventory_record::Entity::insert(inventory_record::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                tenant_id: Set(cmd.tenant_id),
                                product_id: Set(cmd.product_id),
                                warehouse_id: Set(cmd.to_warehouse_id),
                                quantity: Set(cmd.quantity),
                                reserved_quantity: Set(0),
                                reorder_level: Set(source.reorder_level),
                                max_stock_level: Set(source.max_stock_level),
                                unit_cost: Set(source.unit_cost),
                                condition: Set(StockCondition::Good),
                                created_at: Set(now),
                                updated_at: Set(now),
                            })
                            .exec(txn)
                            .await?;
                        }
                    }

                    Ok(())
                })
            })
            .await?;

        info!(
            product_id = %self.product_id,
            from = %self.from_warehouse_id,
            to = %self.to_warehouse_id,
            quantity = self.quantity,
            "Inventory transferred"
        );
        event_sender
            .send(Event::InventoryTransferred {
                product_id: self.product_id,
                from_warehouse_id: self.from_warehouse_id,
                to_warehouse_id: self.to_warehouse_id,
                quantity: self.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
