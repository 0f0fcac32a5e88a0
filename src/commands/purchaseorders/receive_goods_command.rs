use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        goods_receipt, goods_receipt_line, inventory_record,
        inventory_record::StockCondition,
        purchase_order::{self, PurchaseOrderStatus},
        purchase_order_line,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref GOODS_RECEIPTS: IntCounter = IntCounter::new(
        "goods_receipts_total",
        "Total number of goods receipts recorded"
    )
    .expect("metric can be created");
    static ref GOODS_RECEIPT_FAILURES: IntCounter = IntCounter::new(
        "goods_receipt_failures_total",
        "Total number of failed goods receipts"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReceiptLineRequest {
    pub purchase_order_line_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Records a delivery against a confirmed or in-transit order.
///
/// A single receipt may cover any subset of the order lines. Received
/// quantities accumulate on the order lines; once every line is fully
/// received the order moves to Delivered, otherwise PartiallyDelivered.
/// Stock at the receiving warehouse is credited in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReceiveGoodsCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub received_by: Uuid,
    pub warehouse_id: Uuid,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub lines: Vec<ReceiptLineRequest>,
}

#[derive(Debug, Serialize)]
pub struct ReceiveGoodsResult {
    pub goods_receipt_id: Uuid,
    pub grn_number: String,
    pub status: PurchaseOrderStatus,
    pub fully_delivered: bool,
}

#[async_trait::async_trait]
impl Command for ReceiveGoodsCommand {
    type Result = ReceiveGoodsResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        for line in &self.lines {
            line.validate()?;
        }

        let cmd = self.clone();
        let result = db_pool
            .transaction::<_, ReceiveGoodsResult, ServiceError>(|txn| {
                Box::pin(async move { cmd.apply(txn).await })
            })
            .await
            .map_err(|e| {
                GOODS_RECEIPT_FAILURES.inc();
                error!(purchase_order_id = %self.id, "Goods receipt failed: {}", e);
                ServiceError::from(e)
            })?;

        GOODS_RECEIPTS.inc();
        info!(
            purchase_order_id = %self.id,
            goods_receipt_id = %result.goods_receipt_id,
            fully_delivered = result.fully_delivered,
            "Goods receipt recorded"
        );
        event_sender
            .send(Event::GoodsReceived {
                purchase_order_id: self.id,
                goods_receipt_id: result.goods_receipt_id,
                fully_delivered: result.fully_delivered,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(result)
    }
}

impl ReceiveGoodsCommand {
    async fn apply(
        &self,
        txn: &sea_orm::DatabaseTransaction,
    ) -> Result<ReceiveGoodsResult, ServiceError> {
        let order = purchase_order::Entity::find_by_id(self.id)
            .filter(purchase_order::Column::TenantId.eq(self.tenant_id))
            .one(txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {}", self.id)))?;

        if !order.status.can_receive_goods() {
            return Err(ServiceError::InvalidTransition(format!(
                "Purchase order {} cannot receive goods in {:?}",
                self.id, order.status
            )));
        }

        let order_lines = purchase_order_line::Entity::find()
            .filter(purchase_order_line::Column::PurchaseOrderId.eq(self.id))
            .all(txn)
            .await?;
        let mut by_id: HashMap<Uuid, purchase_order_line::Model> =
            order_lines.into_iter().map(|l| (l.id, l)).collect();

        // Validate every line before mutating anything so a bad line leaves
        // the order untouched.
        for req in &self.lines {
            let line = by_id.get(&req.purchase_order_line_id).ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Line {} does not belong to purchase order {}",
                    req.purchase_order_line_id, self.id
                ))
            })?;
            let remaining = line.quantity_ordered - line.quantity_received;
            if req.quantity > remaining {
                return Err(ServiceError::ValidationError(format!(
                    "Receipt of {} exceeds remaining quantity {} on line {}",
                    req.quantity, remaining, line.id
                )));
            }
        }

        let now = Utc::now();
        let receipt_id = Uuid::new_v4();
        let grn_number = format!("GRN-{}", Uuid::new_v4().simple());

        goods_receipt::Entity::insert(goods_receipt::ActiveModel {
            id: Set(receipt_id),
            purchase_order_id: Set(self.id),
            grn_number: Set(grn_number.clone()),
            received_by: Set(self.received_by),
            received_date: Set(now),
            notes: Set(self.notes.clone()),
            created_at: Set(now),
        })
        .exec(txn)
        .await?;

        for req in &self.lines {
            // Presence verified above.
            let line = match by_id.get_mut(&req.purchase_order_line_id) {
                Some(line) => line,
                None => continue,
            };
            let new_received = line.quantity_received + req.quantity;

            purchase_order_line::Entity::update_many()
                .col_expr(
                    purchase_order_line::Column::QuantityReceived,
                    Expr::value(new_received),
                )
                .filter(purchase_order_line::Column::Id.eq(line.id))
                .exec(txn)
                .await?;
            line.quantity_received = new_received;

            goods_receipt_line::Entity::insert(goods_receipt_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                goods_receipt_id: Set(receipt_id),
                purchase_order_line_id: Set(line.id),
                quantity_received: Set(req.quantity),
            })
            .exec(txn)
            .await?;

            self.credit_stock(txn, line.product_id, req.quantity, line.unit_price)
                .await?;
        }

        let fully_delivered = by_id
            .values()
            .all(|l| l.quantity_received >= l.quantity_ordered);
        let target = if fully_delivered {
            PurchaseOrderStatus::Delivered
        } else {
            PurchaseOrderStatus::PartiallyDelivered
        };

        let mut update = purchase_order::Entity::update_many()
            .col_expr(purchase_order::Column::Status, Expr::value(target))
            .col_expr(
                purchase_order::Column::Version,
                Expr::col(purchase_order::Column::Version).add(1),
            )
            .col_expr(purchase_order::Column::UpdatedAt, Expr::value(now));
        if fully_delivered {
            update = update.col_expr(
                purchase_order::Column::ActualDeliveryDate,
                Expr::value(Some(now.date_naive())),
            );
        }
        let result = update
            .filter(purchase_order::Column::Id.eq(self.id))
            .filter(purchase_order::Column::Status.eq(order.status))
            .filter(purchase_order::Column::Version.eq(order.version))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Purchase order {} was modified concurrently",
                self.id
            )));
        }

        Ok(ReceiveGoodsResult {
            goods_receipt_id: receipt_id,
            grn_number,
            status: target,
            fully_delivered,
        })
    }

    /// Credits received stock at the receiving warehouse, creating the
    /// inventory row on first receipt of a product there.
    async fn credit_stock(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        product_id: Uuid,
        quantity: i32,
        unit_cost: rust_decimal::Decimal,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();
        let existing = inventory_record::Entity::find()
            .filter(inventory_record::Column::TenantId.eq(self.tenant_id))
            .filter(inventory_record::Column::ProductId.eq(product_id))
            .filter(inventory_record::Column::WarehouseId.eq(self.warehouse_id))
            .one(txn)
            .await?;

        match existing {
            Some(record) => {
                inventory_record::Entity::update_many()
                    .col_expr(
                        inventory_record::Column::Quantity,
                        Expr::col(inventory_record::Column::Quantity).add(quantity),
                    )
                    .col_expr(inventory_record::Column::UpdatedAt, Expr::value(now))
                    .filter(inventory_record::Column::Id.eq(record.id))
                    .exec(txn)
                    .await?;
            }
            None => {
                inventory_record::Entity::insert(inventory_record::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    tenant_id: Set(self.tenant_id),
                    product_id: Set(product_id),
                    warehouse_id: Set(self.warehouse_id),
                    quantity: Set(quantity),
                    reserved_quantity: Set(0),
                    reorder_level: Set(0),
                    max_stock_level: Set(0),
                    unit_cost: Set(unit_cost),
                    condition: Set(StockCondition::New),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .exec(txn)
                .await?;
            }
        }
        Ok(())
    }
}
