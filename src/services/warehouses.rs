use crate::{
    db::DbPool,
    entities::warehouse,
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWarehouseInput {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWarehouseInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Service for the warehouse registry.
#[derive(Clone)]
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_warehouse(
        &self,
        tenant_id: Uuid,
        input: CreateWarehouseInput,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;

        let duplicate = warehouse::Entity::find()
            .filter(warehouse::Column::TenantId.eq(tenant_id))
            .filter(warehouse::Column::Code.eq(input.code.clone()))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Warehouse code {} already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let model = warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            code: Set(input.code),
            name: Set(input.name),
            location: Set(input.location),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(warehouse_id = %model.id, code = %model.code, "Warehouse created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_warehouse(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateWarehouseInput,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;
        let current = self.get_warehouse(tenant_id, id).await?;

        let mut active: warehouse::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_warehouse(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<warehouse::Model, ServiceError> {
        warehouse::Entity::find_by_id(id)
            .filter(warehouse::Column::TenantId.eq(tenant_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_warehouses(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<warehouse::Model>, ServiceError> {
        warehouse::Entity::find()
            .filter(warehouse::Column::TenantId.eq(tenant_id))
            .order_by_asc(warehouse::Column::Code)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
