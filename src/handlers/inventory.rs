use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    commands::inventory::{AdjustInventoryCommand, TransferInventoryCommand},
    context::RequestContext,
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustInventoryRequest {
    pub delta: i32,
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferInventoryRequest {
    pub product_id: Uuid,
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InventoryListQuery {
    pub warehouse_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

/// List inventory records with optional warehouse/product filters
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventoryListQuery, PaginationParams),
    responses(
        (status = 200, description = "Inventory page returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<InventoryListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .inventory
        .list_inventory(
            ctx.tenant_id,
            query.warehouse_id,
            query.product_id,
            pagination.page,
            pagination.per_page,
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        items,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Fetch one inventory record with derived quantities
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory record id")),
    responses(
        (status = 200, description = "Inventory record returned"),
        (status = 404, description = "Record not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory_record(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .inventory
        .get_inventory_record(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "record": record,
        "available_quantity": record.available_quantity(),
        "total_value": record.total_value(),
    })))
}

/// Records at or below their reorder level (live view)
#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    responses((status = 200, description = "Low-stock records returned")),
    tag = "inventory"
)]
pub async fn list_low_stock(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .list_low_stock(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Records whose on-hand quantity has reached zero
#[utoipa::path(
    get,
    path = "/api/v1/inventory/out-of-stock",
    responses((status = 200, description = "Out-of-stock records returned")),
    tag = "inventory"
)]
pub async fn list_out_of_stock(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .list_out_of_stock(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Apply a signed quantity delta with a mandatory reason
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/adjust",
    params(("id" = Uuid, Path, description = "Inventory record id")),
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Adjustment applied"),
        (status = 404, description = "Record not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustInventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let result = state
        .services
        .inventory
        .adjust_inventory(AdjustInventoryCommand {
            inventory_id: id,
            tenant_id: ctx.tenant_id,
            delta: payload.delta,
            reason: payload.reason,
            adjusted_by: ctx.actor_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "inventory_id": result.inventory_id,
        "old_quantity": result.old_quantity,
        "new_quantity": result.new_quantity,
    })))
}

/// Audit trail of manual adjustments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}/adjustments",
    params(("id" = Uuid, Path, description = "Inventory record id")),
    responses(
        (status = 200, description = "Adjustment history returned"),
        (status = 404, description = "Record not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_adjustments(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .list_adjustments(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Move stock of one product between two warehouses atomically
#[utoipa::path(
    post,
    path = "/api/v1/inventory/transfer",
    request_body = TransferInventoryRequest,
    responses(
        (status = 200, description = "Transfer committed"),
        (status = 404, description = "No stock at source", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn transfer_inventory(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<TransferInventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .inventory
        .transfer_inventory(TransferInventoryCommand {
            tenant_id: ctx.tenant_id,
            product_id: payload.product_id,
            from_warehouse_id: payload.from_warehouse_id,
            to_warehouse_id: payload.to_warehouse_id,
            quantity: payload.quantity,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "transferred": payload.quantity })))
}

pub fn inventory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/low-stock", get(list_low_stock))
        .route("/out-of-stock", get(list_out_of_stock))
        .route("/transfer", post(transfer_inventory))
        .route("/:id", get(get_inventory_record))
        .route("/:id/adjust", post(adjust_inventory))
        .route("/:id/adjustments", get(list_adjustments))
}
