use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    context::RequestContext,
    entities::supplier::SupplierStatus,
    errors::ApiError,
    handlers::AppState,
    services::suppliers::{CreateSupplierInput, UpdateSupplierInput},
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
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RateSupplierRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierListQuery {
    pub status: Option<SupplierStatus>,
}

async fn create_supplier(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateSupplierInput>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .create_supplier(ctx.tenant_id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(supplier))
}

async fn update_supplier(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierInput>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .update_supplier(ctx.tenant_id, id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(supplier))
}

async fn get_supplier(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(supplier))
}

async fn list_suppliers(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<SupplierListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .suppliers
        .list_suppliers(
            ctx.tenant_id,
            query.status,
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

async fn rate_supplier(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let new_average = state
        .services
        .suppliers
        .rate_supplier(
            ctx.tenant_id,
            id,
            payload.rating,
            payload.comment,
            ctx.actor_id,
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "supplier_id": id,
        "rating": new_average,
    })))
}

async fn list_ratings(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .suppliers
        .list_ratings(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

pub fn supplier_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier).put(update_supplier))
        .route("/:id/ratings", post(rate_supplier).get(list_ratings))
}
