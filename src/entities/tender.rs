use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TenderType {
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Restricted")]
    Restricted,
    #[sea_orm(string_value = "RFQ")]
    Rfq,
}

/// Tender lifecycle. Closing is time-driven: a Published tender past its
/// closing date no longer accepts bids even while the stored status still
/// reads Published. Awarded is an explicit administrative action.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TenderStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Published")]
    Published,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Awarded")]
    Awarded,
}

impl TenderStatus {
    pub fn can_transition_to(&self, next: &Self) -> bool {
        use TenderStatus::*;
        matches!(
            (self, next),
            (Draft, Published) | (Published, Closed) | (Published, Awarded) | (Closed, Awarded)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub tender_number: String,
    pub title: String,
    pub description: Option<String>,
    pub tender_type: TenderType,
    pub category: Option<String>,
    pub status: TenderStatus,
    pub opening_date: DateTime<Utc>,
    pub closing_date: DateTime<Utc>,
    pub budget: Option<Decimal>,
    pub awarded_bid_id: Option<Uuid>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Bid acceptance is gated by the closing date, not by a stored flag.
    pub fn accepts_bids(&self, now: DateTime<Utc>) -> bool {
        self.status == TenderStatus::Published && now <= self.closing_date
    }

    /// Scoring and awarding are only permitted once the deadline has passed.
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            TenderStatus::Closed | TenderStatus::Awarded => true,
            TenderStatus::Published => now > self.closing_date,
            TenderStatus::Draft => false,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bid::Entity")]
    Bids,
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tender(status: TenderStatus, closes_in: Duration) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            tender_number: "TDR-1".into(),
            title: "Lab equipment".into(),
            description: None,
            tender_type: TenderType::Open,
            category: None,
            status,
            opening_date: now - Duration::days(7),
            closing_date: now + closes_in,
            budget: None,
            awarded_bid_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn published_tender_accepts_bids_until_closing() {
        let t = tender(TenderStatus::Published, Duration::hours(1));
        assert!(t.accepts_bids(Utc::now()));
        assert!(!t.is_closed(Utc::now()));
    }

    #[test]
    fn closing_is_implicit_once_deadline_passes() {
        let t = tender(TenderStatus::Published, Duration::hours(-1));
        assert!(!t.accepts_bids(Utc::now()));
        assert!(t.is_closed(Utc::now()));
    }

    #[test]
    fn draft_tender_never_accepts_bids() {
        let t = tender(TenderStatus::Draft, Duration::hours(1));
        assert!(!t.accepts_bids(Utc::now()));
    }
}
