use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entities::purchase_order::{self, PurchaseOrderStatus},
    errors::ServiceError,
};

pub mod approve_purchase_order_command;
pub mod cancel_purchase_order_command;
pub mod complete_purchase_order_command;
pub mod confirm_purchase_order_command;
pub mod create_purchase_order_command;
pub mod receive_goods_command;
pub mod record_invoice_command;
pub mod record_payment_command;
pub mod reject_purchase_order_command;
pub mod send_purchase_order_command;
pub mod submit_purchase_order_command;

pub use approve_purchase_order_command::ApprovePurchaseOrderCommand;
pub use cancel_purchase_order_command::CancelPurchaseOrderCommand;
pub use complete_purchase_order_command::CompletePurchaseOrderCommand;
pub use confirm_purchase_order_command::ConfirmPurchaseOrderCommand;
pub use create_purchase_order_command::{CreatePurchaseOrderCommand, PurchaseOrderLineRequest};
pub use receive_goods_command::{ReceiveGoodsCommand, ReceiptLineRequest};
pub use record_invoice_command::RecordInvoiceCommand;
pub use record_payment_command::RecordPaymentCommand;
pub use reject_purchase_order_command::RejectPurchaseOrderCommand;
pub use send_purchase_order_command::SendPurchaseOrderCommand;
pub use submit_purchase_order_command::SubmitPurchaseOrderCommand;

/// Shared precheck-then-conditional-update transition.
///
/// Reads the order, validates the transition table against the freshly read
/// status (InvalidTransition on failure), then applies a version-filtered
/// update. A passing precheck that loses the update race is a Conflict.
pub(crate) async fn transition_purchase_order<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    id: Uuid,
    target: PurchaseOrderStatus,
    extra_cols: Vec<(purchase_order::Column, SimpleExpr)>,
) -> Result<purchase_order::Model, ServiceError> {
    let current = purchase_order::Entity::find_by_id(id)
        .filter(purchase_order::Column::TenantId.eq(tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {}", id)))?;

    if !current.status.can_transition_to(&target) {
        return Err(ServiceError::InvalidTransition(format!(
            "Purchase order {} cannot move from {:?} to {:?}",
            id, current.status, target
        )));
    }

    apply_transition(db, &current, target, extra_cols).await?;
    Ok(current)
}

/// Conditional update keyed on the snapshot's status and version. Zero
/// affected rows means another writer committed between the snapshot and
/// this update.
pub(crate) async fn apply_transition<C: ConnectionTrait>(
    db: &C,
    current: &purchase_order::Model,
    target: PurchaseOrderStatus,
    extra_cols: Vec<(purchase_order::Column, SimpleExpr)>,
) -> Result<(), ServiceError> {
    let mut update = purchase_order::Entity::update_many()
        .col_expr(purchase_order::Column::Status, Expr::value(target))
        .col_expr(
            purchase_order::Column::Version,
            Expr::col(purchase_order::Column::Version).add(1),
        )
        .col_expr(purchase_order::Column::UpdatedAt, Expr::value(Utc::now()));

    for (column, expr) in extra_cols {
        update = update.col_expr(column, expr);
    }

    let result = update
        .filter(purchase_order::Column::Id.eq(current.id))
        .filter(purchase_order::Column::Status.eq(current.status))
        .filter(purchase_order::Column::Version.eq(current.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::Conflict(format!(
            "Purchase order {} was modified concurrently",
            current.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::{self, DbPool};
    use crate::entities::purchase_order::PaymentStatus;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Set};

    async fn migrated_pool() -> DbPool {
        let cfg = AppConfig::for_tests("sqlite::memory:");
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn sent_order(db: &DbPool) -> purchase_order::Model {
        let now = Utc::now();
        purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(Uuid::new_v4()),
            po_number: Set("PO-20260830-0001".to_string()),
            supplier_id: Set(Uuid::new_v4()),
            requisition_id: Set(None),
            tender_id: Set(None),
            status: Set(PurchaseOrderStatus::Sent),
            payment_status: Set(PaymentStatus::Pending),
            order_date: Set(now),
            expected_delivery_date: Set(None),
            actual_delivery_date: Set(None),
            total_amount: Set(Decimal::from(100)),
            tax_amount: Set(Decimal::ZERO),
            grand_total: Set(Decimal::from(100)),
            amount_paid: Set(Decimal::ZERO),
            currency: Set("USD".to_string()),
            notes: Set(None),
            cancellation_reason: Set(None),
            created_by: Set(Uuid::new_v4()),
            approved_by: Set(None),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap()
    }

    // Two writers hold the same snapshot, so both pass the transition
    // check; the conditional update lets exactly one of them commit.
    #[tokio::test]
    async fn losing_the_update_race_is_a_conflict() {
        let pool = migrated_pool().await;
        let order = sent_order(&pool).await;

        let first = order.clone();
        let second = order.clone();
        assert!(first
            .status
            .can_transition_to(&PurchaseOrderStatus::Confirmed));
        assert!(second
            .status
            .can_transition_to(&PurchaseOrderStatus::Confirmed));

        apply_transition(&pool, &first, PurchaseOrderStatus::Confirmed, Vec::new())
            .await
            .unwrap();

        let lost =
            apply_transition(&pool, &second, PurchaseOrderStatus::Confirmed, Vec::new()).await;
        assert_matches!(lost, Err(ServiceError::Conflict(_)));

        // A fresh read after the lost race fails the precheck instead.
        let reread = transition_purchase_order(
            &pool,
            order.tenant_id,
            order.id,
            PurchaseOrderStatus::Confirmed,
            Vec::new(),
        )
        .await;
        assert_matches!(reread, Err(ServiceError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn winning_transition_bumps_the_version() {
        let pool = migrated_pool().await;
        let order = sent_order(&pool).await;

        transition_purchase_order(
            &pool,
            order.tenant_id,
            order.id,
            PurchaseOrderStatus::Confirmed,
            Vec::new(),
        )
        .await
        .unwrap();

        let updated = purchase_order::Entity::find_by_id(order.id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, PurchaseOrderStatus::Confirmed);
        assert_eq!(updated.version, order.version + 1);
    }
}
