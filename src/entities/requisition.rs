use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Requisition lifecycle. Rejected and Cancelled are terminal; Converted is
/// set exactly once when a purchase order is created from the requisition,
/// after which the requisition is read-only.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RequisitionStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
    #[sea_orm(string_value = "Converted")]
    Converted,
}

impl RequisitionStatus {
    /// Closed transition table; anything not listed here is rejected.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        use RequisitionStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Draft, Cancelled)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Approved, Converted)
                | (Approved, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequisitionStatus::Rejected | RequisitionStatus::Cancelled | RequisitionStatus::Converted
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RequisitionPriority {
    #[sea_orm(string_value = "Low")]
    Low,
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "High")]
    High,
    #[sea_orm(string_value = "Urgent")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requisitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub requisition_number: String,
    pub department: String,
    pub status: RequisitionStatus,
    pub priority: RequisitionPriority,
    pub required_by: Option<chrono::NaiveDate>,
    /// Always equals the sum of line totals; recomputed on every line mutation.
    pub total_amount: Decimal,
    pub approval_comments: Option<String>,
    pub requested_by: Uuid,
    pub approved_by: Option<Uuid>,
    /// Set when the requisition is converted; at most one PO per requisition.
    pub converted_po_id: Option<Uuid>,
    /// Optimistic concurrency token, bumped on every status transition.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::requisition_line::Entity")]
    Lines,
}

impl Related<super::requisition_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::RequisitionStatus::*;

    #[test]
    fn rejected_and_cancelled_are_terminal() {
        for terminal in [Rejected, Cancelled, Converted] {
            assert!(terminal.is_terminal());
            for next in [Draft, Pending, Approved, Rejected, Cancelled, Converted] {
                assert!(!terminal.can_transition_to(&next));
            }
        }
    }

    #[test]
    fn conversion_only_from_approved() {
        assert!(Approved.can_transition_to(&Converted));
        assert!(!Draft.can_transition_to(&Converted));
        assert!(!Pending.can_transition_to(&Converted));
    }
}
