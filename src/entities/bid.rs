use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum awardable technical score.
pub const TECHNICAL_MAX: i32 = 70;
/// Maximum awardable financial score.
pub const FINANCIAL_MAX: i32 = 30;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tender_id: Uuid,
    pub supplier_id: Uuid,
    pub total_amount: Decimal,
    /// How long the offer stands after submission.
    pub validity_days: i32,
    pub proposal_document: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub technical_score: Option<Decimal>,
    pub financial_score: Option<Decimal>,
    pub total_score: Option<Decimal>,
    pub evaluator_comments: Option<String>,
    pub scored_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tender::Entity",
        from = "Column::TenderId",
        to = "super::tender::Column::Id"
    )]
    Tender,
}

impl Related<super::tender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
