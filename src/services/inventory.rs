use crate::{
    commands::inventory::{AdjustInventoryCommand, TransferInventoryCommand},
    commands::inventory::adjust_inventory_command::AdjustInventoryResult,
    commands::Command,
    db::DbPool,
    entities::{inventory_record, stock_adjustment},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the inventory ledger.
///
/// Low-stock and out-of-stock are live queries, never stored flags, so a
/// quantity change is immediately reflected in both listings.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn adjust_inventory(
        &self,
        command: AdjustInventoryCommand,
    ) -> Result<AdjustInventoryResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn transfer_inventory(
        &self,
        command: TransferInventoryCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_inventory_record(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<inventory_record::Model, ServiceError> {
        inventory_record::Entity::find_by_id(id)
            .filter(inventory_record::Column::TenantId.eq(tenant_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory record {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_inventory(
        &self,
        tenant_id: Uuid,
        warehouse_id: Option<Uuid>,
        product_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_record::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = inventory_record::Entity::find()
            .filter(inventory_record::Column::TenantId.eq(tenant_id))
            .order_by_asc(inventory_record::Column::ProductId);
        if let Some(warehouse_id) = warehouse_id {
            query = query.filter(inventory_record::Column::WarehouseId.eq(warehouse_id));
        }
        if let Some(product_id) = product_id {
            query = query.filter(inventory_record::Column::ProductId.eq(product_id));
        }
        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Records with 0 < quantity <= reorder_level.
    #[instrument(skip(self))]
    pub async fn list_low_stock(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<inventory_record::Model>, ServiceError> {
        inventory_record::Entity::find()
            .filter(inventory_record::Column::TenantId.eq(tenant_id))
            .filter(inventory_record::Column::Quantity.gt(0))
            .filter(
                Expr::col(inventory_record::Column::Quantity)
                    .lte(Expr::col(inventory_record::Column::ReorderLevel)),
            )
            .order_by_asc(inventory_record::Column::Quantity)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Records whose on-hand quantity has reached zero.
    #[instrument(skip(self))]
    pub async fn list_out_of_stock(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<inventory_record::Model>, ServiceError> {
        inventory_record::Entity::find()
            .filter(inventory_record::Column::TenantId.eq(tenant_id))
            .filter(inventory_record::Column::Quantity.eq(0))
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Audit trail of manual adjustments for one record, newest first.
    #[instrument(skip(self))]
    pub async fn list_adjustments(
        &self,
        tenant_id: Uuid,
        inventory_id: Uuid,
    ) -> Result<Vec<stock_adjustment::Model>, ServiceError> {
        // Tenant scoping rides on the parent record.
        self.get_inventory_record(tenant_id, inventory_id).await?;
        stock_adjustment::Entity::find()
            .filter(stock_adjustment::Column::InventoryId.eq(inventory_id))
            .order_by_desc(stock_adjustment::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
