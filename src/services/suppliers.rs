use crate::{
    db::DbPool,
    entities::supplier::{self, SupplierStatus},
    entities::supplier_rating,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub bank_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSupplierInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub bank_details: Option<String>,
    pub status: Option<SupplierStatus>,
}

/// Service for the supplier registry and performance ratings.
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        tenant_id: Uuid,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(input.name),
            registration_number: Set(input.registration_number),
            tax_id: Set(input.tax_id),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            bank_details: Set(input.bank_details),
            status: Set(SupplierStatus::Active),
            rating: Set(Decimal::ZERO),
            rating_count: Set(0),
            on_time_delivery_rate: Set(Decimal::ZERO),
            total_spent: Set(Decimal::ZERO),
            quality_score: Set(Decimal::ZERO),
            average_lead_time_days: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(supplier_id = %model.id, name = %model.name, "Supplier created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let current = self.get_supplier(tenant_id, id).await?;

        let mut active: supplier::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(email) = input.contact_email {
            active.contact_email = Set(Some(email));
        }
        if let Some(phone) = input.contact_phone {
            active.contact_phone = Set(Some(phone));
        }
        if let Some(bank) = input.bank_details {
            active.bank_details = Set(Some(bank));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .filter(supplier::Column::TenantId.eq(tenant_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        tenant_id: Uuid,
        status: Option<SupplierStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = supplier::Entity::find()
            .filter(supplier::Column::TenantId.eq(tenant_id))
            .order_by_asc(supplier::Column::Name);
        if let Some(status) = status {
            query = query.filter(supplier::Column::Status.eq(status));
        }
        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Appends a rating event and folds it into the supplier's rolling
    /// average in one transaction.
    #[instrument(skip(self))]
    pub async fn rate_supplier(
        &self,
        tenant_id: Uuid,
        supplier_id: Uuid,
        rating: i16,
        comment: Option<String>,
        rated_by: Uuid,
    ) -> Result<Decimal, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let new_average = self
            .db_pool
            .transaction::<_, Decimal, ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = supplier::Entity::find_by_id(supplier_id)
                        .filter(supplier::Column::TenantId.eq(tenant_id))
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Supplier {}", supplier_id))
                        })?;

                    let now = Utc::now();
                    supplier_rating::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        supplier_id: Set(supplier_id),
                        rating: Set(rating),
                        comment: Set(comment),
                        rated_by: Set(rated_by),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let count = current.rating_count + 1;
                    let new_average = (current.rating * Decimal::from(current.rating_count)
                        + Decimal::from(rating))
                        / Decimal::from(count);

                    supplier::Entity::update_many()
                        .col_expr(supplier::Column::Rating, Expr::value(new_average))
                        .col_expr(supplier::Column::RatingCount, Expr::value(count))
                        .col_expr(supplier::Column::UpdatedAt, Expr::value(now))
                        .filter(supplier::Column::Id.eq(supplier_id))
                        .exec(txn)
                        .await?;

                    Ok(new_average)
                })
            })
            .await?;

        info!(supplier_id = %supplier_id, rating, new_average = %new_average, "Supplier rated");
        self.event_sender
            .send(Event::SupplierRated {
                supplier_id,
                rating,
                new_average,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(new_average)
    }

    /// Rating history for a supplier, newest first.
    #[instrument(skip(self))]
    pub async fn list_ratings(
        &self,
        tenant_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Vec<supplier_rating::Model>, ServiceError> {
        self.get_supplier(tenant_id, supplier_id).await?;
        supplier_rating::Entity::find()
            .filter(supplier_rating::Column::SupplierId.eq(supplier_id))
            .order_by_desc(supplier_rating::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
