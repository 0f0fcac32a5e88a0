use super::common::{created_response, map_service_error, success_response};
use crate::{
    context::RequestContext,
    errors::ApiError,
    handlers::AppState,
    services::warehouses::{CreateWarehouseInput, UpdateWarehouseInput},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateWarehouseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .warehouses
        .create_warehouse(ctx.tenant_id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(warehouse))
}

async fn update_warehouse(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWarehouseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .warehouses
        .update_warehouse(ctx.tenant_id, id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(warehouse))
}

async fn get_warehouse(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .warehouses
        .get_warehouse(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(warehouse))
}

async fn list_warehouses(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .warehouses
        .list_warehouses(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

pub fn warehouse_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_warehouse).get(list_warehouses))
        .route("/:id", get(get_warehouse).put(update_warehouse))
}
