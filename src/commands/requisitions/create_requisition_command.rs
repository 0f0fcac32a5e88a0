use crate::{
    commands::Command,
    db::DbPool,
    entities::requisition::{self, RequisitionPriority, RequisitionStatus},
    entities::requisition_line,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref REQUISITION_CREATIONS: IntCounter = IntCounter::new(
        "requisition_creations_total",
        "Total number of requisitions created"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequisitionLineRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i32,
    #[validate(length(min = 1))]
    pub unit: String,
    pub estimated_unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateRequisitionCommand {
    pub tenant_id: Uuid,
    pub requested_by: Uuid,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    pub priority: RequisitionPriority,
    pub required_by: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub lines: Vec<RequisitionLineRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRequisitionResult {
    pub id: Uuid,
    pub requisition_number: String,
    pub total_amount: Decimal,
}

#[async_trait::async_trait]
impl Command for CreateRequisitionCommand {
    type Result = CreateRequisitionResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid requisition input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        for line in &self.lines {
            line.validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
            if line.estimated_unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Estimated unit price for '{}' must not be negative",
                    line.description
                )));
            }
        }

        let requisition_id = Uuid::new_v4();
        let requisition_number = format!("REQ-{}", Uuid::new_v4().simple());
        let total_amount: Decimal = self
            .lines
            .iter()
            .map(|l| Decimal::from(l.quantity) * l.estimated_unit_price)
            .sum();

        let tenant_id = self.tenant_id;
        let requested_by = self.requested_by;
        let department = self.department.clone();
        let priority = self.priority;
        let required_by = self.required_by;
        let lines = self.lines.clone();
        let number = requisition_number.clone();

        let db = db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                requisition::ActiveModel {
                    id: Set(requisition_id),
                    tenant_id: Set(tenant_id),
                    requisition_number: Set(number),
                    department: Set(department),
                    status: Set(RequisitionStatus::Draft),
                    priority: Set(priority),
                    required_by: Set(required_by),
                    total_amount: Set(total_amount),
                    approval_comments: Set(None),
                    requested_by: Set(requested_by),
                    approved_by: Set(None),
                    converted_po_id: Set(None),
                    version: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                for line in &lines {
                    requisition_line::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        requisition_id: Set(requisition_id),
                        description: Set(line.description.clone()),
                        quantity: Set(line.quantity),
                        unit: Set(line.unit.clone()),
                        estimated_unit_price: Set(line.estimated_unit_price),
                        line_total: Set(Decimal::from(line.quantity) * line.estimated_unit_price),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                }

                Ok(())
            })
        })
        .await?;

        REQUISITION_CREATIONS.inc();
        info!(
            requisition_id = %requisition_id,
            department = %self.department,
            total_amount = %total_amount,
            "Requisition created"
        );

        event_sender
            .send(Event::RequisitionCreated(requisition_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(CreateRequisitionResult {
            id: requisition_id,
            requisition_number,
            total_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn command(lines: Vec<RequisitionLineRequest>) -> CreateRequisitionCommand {
        CreateRequisitionCommand {
            tenant_id: Uuid::new_v4(),
            requested_by: Uuid::new_v4(),
            department: "Science".into(),
            priority: RequisitionPriority::Medium,
            required_by: None,
            lines,
        }
    }

    #[test]
    fn rejects_zero_quantity_lines() {
        let line = RequisitionLineRequest {
            description: "Beakers".into(),
            quantity: 0,
            unit: "box".into(),
            estimated_unit_price: dec!(5),
        };
        assert!(line.validate().is_err());
    }

    #[test]
    fn rejects_empty_line_list() {
        let cmd = command(vec![]);
        assert!(cmd.validate().is_err());
    }
}
