use crate::{
    commands::Command,
    db::DbPool,
    entities::tender::{self, TenderStatus, TenderType},
    errors::ServiceError,
    events::EventSender,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Creates a tender in Draft. Nothing is visible to suppliers until the
/// tender is published.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTenderCommand {
    pub tenant_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub tender_type: TenderType,
    pub category: Option<String>,
    pub opening_date: DateTime<Utc>,
    pub closing_date: DateTime<Utc>,
    pub budget: Option<Decimal>,
}

#[async_trait::async_trait]
impl Command for CreateTenderCommand {
    type Result = tender::Model;

    #[instrument(skip(self, db_pool, _event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        _event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        if self.closing_date <= self.opening_date {
            return Err(ServiceError::ValidationError(
                "Closing date must be after the opening date".to_string(),
            ));
        }
        if let Some(budget) = self.budget {
            if budget <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Budget must be positive".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let model = tender::Model {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            tender_number: format!("TDR-{}", Uuid::new_v4().simple()),
            title: self.title.clone(),
            description: self.description.clone(),
            tender_type: self.tender_type,
            category: self.category.clone(),
            status: TenderStatus::Draft,
            opening_date: self.opening_date,
            closing_date: self.closing_date,
            budget: self.budget,
            awarded_bid_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        tender::Entity::insert(tender::ActiveModel {
            id: Set(model.id),
            tenant_id: Set(model.tenant_id),
            tender_number: Set(model.tender_number.clone()),
            title: Set(model.title.clone()),
            description: Set(model.description.clone()),
            tender_type: Set(model.tender_type),
            category: Set(model.category.clone()),
            status: Set(model.status),
            opening_date: Set(model.opening_date),
            closing_date: Set(model.closing_date),
            budget: Set(model.budget),
            awarded_bid_id: Set(None),
            version: Set(model.version),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
        .exec(db_pool.as_ref())
        .await?;

        info!(tender_id = %model.id, tender_number = %model.tender_number, "Tender created");
        Ok(model)
    }
}
