use crate::{
    commands::Command,
    db::DbPool,
    entities::purchase_order::{self, PaymentStatus, PurchaseOrderStatus},
    entities::purchase_order_line,
    entities::supplier::{self, SupplierStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref PO_CREATIONS: IntCounter = IntCounter::new(
        "purchase_order_creations_total",
        "Total number of purchase orders created"
    )
    .expect("metric can be created");
    static ref PO_CREATION_FAILURES: IntCounter = IntCounter::new(
        "purchase_order_creation_failures_total",
        "Total number of failed purchase order creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseOrderLineRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderCommand {
    pub tenant_id: Uuid,
    pub created_by: Uuid,
    pub supplier_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub lines: Vec<PurchaseOrderLineRequest>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub tax_amount: Decimal,
    pub currency: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
    pub total_amount: Decimal,
    pub grand_total: Decimal,
}

#[async_trait::async_trait]
impl Command for CreatePurchaseOrderCommand {
    type Result = CreatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PO_CREATION_FAILURES.inc();
            let msg = format!("Invalid purchase order input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        for line in &self.lines {
            line.validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
            if line.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Unit price for '{}' must not be negative",
                    line.description
                )));
            }
        }
        if self.tax_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Tax amount must not be negative".to_string(),
            ));
        }

        let db = db_pool.as_ref();
        self.validate_supplier(db).await?;

        let po_id = Uuid::new_v4();
        let po_number = format!("PO-{}", Uuid::new_v4().simple());
        let total_amount: Decimal = self
            .lines
            .iter()
            .map(|l| Decimal::from(l.quantity) * l.unit_price)
            .sum();
        let grand_total = total_amount + self.tax_amount;

        let tenant_id = self.tenant_id;
        let created_by = self.created_by;
        let supplier_id = self.supplier_id;
        let expected_delivery_date = self.expected_delivery_date;
        let tax_amount = self.tax_amount;
        let currency = self.currency.clone().unwrap_or_else(|| "USD".to_string());
        let notes = self.notes.clone();
        let lines = self.lines.clone();
        let number = po_number.clone();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                purchase_order::ActiveModel {
                    id: Set(po_id),
                    tenant_id: Set(tenant_id),
                    po_number: Set(number),
                    supplier_id: Set(supplier_id),
                    requisition_id: Set(None),
                    tender_id: Set(None),
                    status: Set(PurchaseOrderStatus::Draft),
                    payment_status: Set(PaymentStatus::Pending),
                    order_date: Set(now),
                    expected_delivery_date: Set(expected_delivery_date),
                    actual_delivery_date: Set(None),
                    total_amount: Set(total_amount),
                    tax_amount: Set(tax_amount),
                    grand_total: Set(grand_total),
                    amount_paid: Set(Decimal::ZERO),
                    currency: Set(currency),
                    notes: Set(notes),
                    cancellation_reason: Set(None),
                    created_by: Set(created_by),
                    approved_by: Set(None),
                    version: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await?;

                for line in &lines {
                    purchase_order_line::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        purchase_order_id: Set(po_id),
                        product_id: Set(line.product_id),
                        description: Set(line.description.clone()),
                        quantity_ordered: Set(line.quantity),
                        quantity_received: Set(0),
                        unit_price: Set(line.unit_price),
                        line_total: Set(Decimal::from(line.quantity) * line.unit_price),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;
                }

                Ok(())
            })
        })
        .await?;

        PO_CREATIONS.inc();
        info!(
            purchase_order_id = %po_id,
            supplier_id = %self.supplier_id,
            line_count = %self.lines.len(),
            grand_total = %grand_total,
            "Purchase order created"
        );

        event_sender
            .send(Event::PurchaseOrderCreated(po_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(CreatePurchaseOrderResult {
            id: po_id,
            po_number,
            total_amount,
            grand_total,
        })
    }
}

impl CreatePurchaseOrderCommand {
    /// Orders may only be raised against active suppliers.
    async fn validate_supplier(&self, db: &DbPool) -> Result<(), ServiceError> {
        let supplier = supplier::Entity::find_by_id(self.supplier_id)
            .filter(supplier::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {}", self.supplier_id)))?;

        if supplier.status != SupplierStatus::Active {
            return Err(ServiceError::ValidationError(format!(
                "Supplier {} is {:?} and cannot receive purchase orders",
                supplier.name, supplier.status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_empty_lines() {
        let cmd = CreatePurchaseOrderCommand {
            tenant_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            lines: vec![],
            expected_delivery_date: None,
            tax_amount: dec!(0),
            currency: None,
            notes: None,
        };
        assert!(cmd.validate().is_err());
    }
}
