use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Purchase order lifecycle. The fulfillment path only moves forward;
/// Cancelled is reachable from every non-terminal state (with a mandatory
/// reason), Rejected only out of PendingApproval.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "PendingApproval")]
    PendingApproval,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Sent")]
    Sent,
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    #[sea_orm(string_value = "InTransit")]
    InTransit,
    #[sea_orm(string_value = "PartiallyDelivered")]
    PartiallyDelivered,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Invoiced")]
    Invoiced,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl PurchaseOrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Completed
                | PurchaseOrderStatus::Cancelled
                | PurchaseOrderStatus::Rejected
        )
    }

    /// Closed transition table for the fulfillment path.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        use PurchaseOrderStatus::*;
        if *next == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Draft, PendingApproval)
                | (Draft, Sent)
                | (PendingApproval, Approved)
                | (PendingApproval, Rejected)
                | (Approved, Sent)
                | (Sent, Confirmed)
                | (Confirmed, InTransit)
                | (Confirmed, PartiallyDelivered)
                | (Confirmed, Delivered)
                | (InTransit, PartiallyDelivered)
                | (InTransit, Delivered)
                | (PartiallyDelivered, PartiallyDelivered)
                | (PartiallyDelivered, Delivered)
                | (Delivered, Invoiced)
                | (Invoiced, Paid)
                | (Paid, Completed)
        )
    }

    /// States in which goods may be received against the order.
    pub fn can_receive_goods(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Confirmed
                | PurchaseOrderStatus::InTransit
                | PurchaseOrderStatus::PartiallyDelivered
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Partial")]
    Partial,
    #[sea_orm(string_value = "Paid")]
    Paid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub po_number: String,
    pub supplier_id: Uuid,
    /// Source requisition, when converted; at most one per PO.
    #[sea_orm(unique)]
    pub requisition_id: Option<Uuid>,
    /// Source tender, when created by an award.
    pub tender_id: Option<Uuid>,
    pub status: PurchaseOrderStatus,
    pub payment_status: PaymentStatus,
    pub order_date: DateTime<Utc>,
    pub expected_delivery_date: Option<chrono::NaiveDate>,
    pub actual_delivery_date: Option<chrono::NaiveDate>,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    /// Invariant: grand_total = total_amount + tax_amount.
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    /// Optimistic concurrency token; receipts and transitions must win the
    /// version race to commit.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order_line::Entity")]
    Lines,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::purchase_order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PurchaseOrderStatus::{self, *};
    use test_case::test_case;

    #[test_case(Draft => true)]
    #[test_case(PendingApproval => true)]
    #[test_case(Approved => true)]
    #[test_case(Sent => true)]
    #[test_case(Confirmed => true)]
    #[test_case(InTransit => true)]
    #[test_case(PartiallyDelivered => true)]
    #[test_case(Delivered => true)]
    #[test_case(Invoiced => true)]
    #[test_case(Paid => true)]
    #[test_case(Completed => false)]
    #[test_case(Cancelled => false)]
    #[test_case(Rejected => false)]
    fn cancel_reachable_from_any_non_terminal_state(from: PurchaseOrderStatus) -> bool {
        from.can_transition_to(&Cancelled)
    }

    #[test]
    fn fulfillment_path_is_forward_only() {
        assert!(Draft.can_transition_to(&Sent));
        assert!(Sent.can_transition_to(&Confirmed));
        assert!(!Confirmed.can_transition_to(&Sent));
        assert!(!Delivered.can_transition_to(&Confirmed));
        assert!(PartiallyDelivered.can_transition_to(&PartiallyDelivered));
    }

    #[test]
    fn goods_receipt_gated_by_status() {
        assert!(Confirmed.can_receive_goods());
        assert!(PartiallyDelivered.can_receive_goods());
        assert!(!Draft.can_receive_goods());
        assert!(!Delivered.can_receive_goods());
    }
}
