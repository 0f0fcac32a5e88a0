use crate::{
    commands::Command,
    db::DbPool,
    entities::purchase_order::{self, PaymentStatus, PurchaseOrderStatus},
    entities::purchase_order_line,
    entities::requisition::{self, RequisitionStatus},
    entities::requisition_line,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

lazy_static! {
    static ref REQUISITION_CONVERSIONS: IntCounter = IntCounter::new(
        "requisition_conversions_total",
        "Total number of requisitions converted to purchase orders"
    )
    .expect("metric can be created");
}

/// The sole bridge from the requisition ledger into the purchase order
/// workflow. Creating the PO and marking the requisition Converted happen
/// in one transaction so an approved requisition can never be spent twice.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertRequisitionCommand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub supplier_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertRequisitionResult {
    pub purchase_order_id: Uuid,
    pub po_number: String,
    pub total_amount: Decimal,
}

#[async_trait::async_trait]
impl Command for ConvertRequisitionCommand {
    type Result = ConvertRequisitionResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let current = requisition::Entity::find_by_id(self.id)
            .filter(requisition::Column::TenantId.eq(self.tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Requisition {}", self.id)))?;

        if !current
            .status
            .can_transition_to(&RequisitionStatus::Converted)
        {
            return Err(ServiceError::InvalidTransition(format!(
                "Requisition {} cannot be converted from {:?}",
                self.id, current.status
            )));
        }

        let po_id = Uuid::new_v4();
        let po_number = format!("PO-{}", Uuid::new_v4().simple());
        let requisition_id = self.id;
        let tenant_id = self.tenant_id;
        let actor_id = self.actor_id;
        let supplier_id = self.supplier_id;
        let required_by = current.required_by;
        let expected_version = current.version;
        let number = po_number.clone();

        let total_amount = db
            .transaction::<_, Decimal, ServiceError>(move |txn| {
                Box::pin(async move {
                    // The Converted mark is the guard: if a concurrent
                    // conversion already flipped it, zero rows match and
                    // the whole transaction rolls back.
                    let marked = requisition::Entity::update_many()
                        .col_expr(
                            requisition::Column::Status,
                            Expr::value(RequisitionStatus::Converted),
                        )
                        .col_expr(requisition::Column::ConvertedPoId, Expr::value(Some(po_id)))
                        .col_expr(
                            requisition::Column::Version,
                            Expr::col(requisition::Column::Version).add(1),
                        )
                        .col_expr(requisition::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(requisition::Column::Id.eq(requisition_id))
                        .filter(requisition::Column::Status.eq(RequisitionStatus::Approved))
                        .filter(requisition::Column::Version.eq(expected_version))
                        .exec(txn)
                        .await?;

                    if marked.rows_affected == 0 {
                        return Err(ServiceError::Conflict(format!(
                            "Requisition {} was converted or modified concurrently",
                            requisition_id
                        )));
                    }

                    let lines = requisition_line::Entity::find()
                        .filter(requisition_line::Column::RequisitionId.eq(requisition_id))
                        .all(txn)
                        .await?;

                    let total_amount: Decimal = lines.iter().map(|l| l.line_total).sum();
                    let now = Utc::now();

                    purchase_order::ActiveModel {
                        id: Set(po_id),
                        tenant_id: Set(tenant_id),
                        po_number: Set(number),
                        supplier_id: Set(supplier_id),
                        requisition_id: Set(Some(requisition_id)),
                        tender_id: Set(None),
                        status: Set(PurchaseOrderStatus::Draft),
                        payment_status: Set(PaymentStatus::Pending),
                        order_date: Set(now),
                        expected_delivery_date: Set(required_by),
                        actual_delivery_date: Set(None),
                        total_amount: Set(total_amount),
                        tax_amount: Set(Decimal::ZERO),
                        grand_total: Set(total_amount),
                        amount_paid: Set(Decimal::ZERO),
                        currency: Set("USD".to_string()),
                        notes: Set(None),
                        cancellation_reason: Set(None),
                        created_by: Set(actor_id),
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
                            // Requisition lines are free-form; the line keeps
                            // its own identity as the product reference.
                            product_id: Set(line.id),
                            description: Set(line.description.clone()),
                            quantity_ordered: Set(line.quantity),
                            quantity_received: Set(0),
                            unit_price: Set(line.estimated_unit_price),
                            line_total: Set(line.line_total),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }

                    Ok(total_amount)
                })
            })
            .await?;

        REQUISITION_CONVERSIONS.inc();
        info!(
            requisition_id = %self.id,
            purchase_order_id = %po_id,
            total_amount = %total_amount,
            "Requisition converted to purchase order"
        );

        event_sender
            .send(Event::RequisitionConverted {
                requisition_id: self.id,
                purchase_order_id: po_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(ConvertRequisitionResult {
            purchase_order_id: po_id,
            po_number,
            total_amount,
        })
    }
}
