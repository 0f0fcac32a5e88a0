use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    commands::requisitions::{
        ApproveRequisitionCommand, CancelRequisitionCommand, ConvertRequisitionCommand,
        CreateRequisitionCommand, RejectRequisitionCommand, RequisitionLineRequest,
        SubmitRequisitionCommand,
    },
    context::RequestContext,
    entities::requisition::{RequisitionPriority, RequisitionStatus},
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, serde::Serialize, Validate, ToSchema)]
pub struct RequisitionLineDto {
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1))]
    pub unit: String,
    pub estimated_unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequisitionRequest {
    #[validate(length(min = 1))]
    pub department: String,
    pub priority: RequisitionPriority,
    pub required_by: Option<NaiveDate>,
    #[validate(length(min = 1))]
    pub lines: Vec<RequisitionLineDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectRequest {
    #[validate(length(min = 1))]
    pub comments: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertRequest {
    pub supplier_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequisitionListQuery {
    pub status: Option<RequisitionStatus>,
}

/// Create a draft requisition with its lines
#[utoipa::path(
    post,
    path = "/api/v1/requisitions",
    request_body = CreateRequisitionRequest,
    responses(
        (status = 201, description = "Requisition created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn create_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateRequisitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreateRequisitionCommand {
        tenant_id: ctx.tenant_id,
        requested_by: ctx.actor_id,
        department: payload.department,
        priority: payload.priority,
        required_by: payload.required_by,
        lines: payload
            .lines
            .into_iter()
            .map(|l| RequisitionLineRequest {
                description: l.description,
                quantity: l.quantity,
                unit: l.unit,
                estimated_unit_price: l.estimated_unit_price,
            })
            .collect(),
    };

    let result = state
        .services
        .requisitions
        .create_requisition(command)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(json!({
        "id": result.id,
        "requisition_number": result.requisition_number,
        "total_amount": result.total_amount,
    })))
}

/// Fetch a requisition and its lines
#[utoipa::path(
    get,
    path = "/api/v1/requisitions/{id}",
    params(("id" = Uuid, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "Requisition returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn get_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (req, lines) = state
        .services
        .requisitions
        .get_requisition(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "requisition": req,
        "lines": lines,
    })))
}

/// List requisitions with optional status filter
#[utoipa::path(
    get,
    path = "/api/v1/requisitions",
    params(RequisitionListQuery, PaginationParams),
    responses((status = 200, description = "Requisition page returned")),
    tag = "requisitions"
)]
pub async fn list_requisitions(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<RequisitionListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .requisitions
        .list_requisitions(
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

/// Submit a draft for approval
#[utoipa::path(
    post,
    path = "/api/v1/requisitions/{id}/submit",
    params(("id" = Uuid, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "Requisition pending approval"),
        (status = 422, description = "Not submittable from current status", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn submit_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .requisitions
        .submit_requisition(SubmitRequisitionCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Pending" })))
}

/// Approve a pending requisition
#[utoipa::path(
    post,
    path = "/api/v1/requisitions/{id}/approve",
    params(("id" = Uuid, Path, description = "Requisition id")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Requisition approved"),
        (status = 409, description = "Lost a concurrent decision race", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not pending approval", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn approve_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .requisitions
        .approve_requisition(ApproveRequisitionCommand {
            id,
            tenant_id: ctx.tenant_id,
            approver_id: ctx.actor_id,
            comments: payload.comments,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Approved" })))
}

/// Reject a pending requisition; a comment is mandatory
#[utoipa::path(
    post,
    path = "/api/v1/requisitions/{id}/reject",
    params(("id" = Uuid, Path, description = "Requisition id")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Requisition rejected"),
        (status = 400, description = "Missing rejection comment", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn reject_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .requisitions
        .reject_requisition(RejectRequisitionCommand {
            id,
            tenant_id: ctx.tenant_id,
            approver_id: ctx.actor_id,
            comments: payload.comments,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Rejected" })))
}

/// Cancel a requisition in any non-terminal state
#[utoipa::path(
    post,
    path = "/api/v1/requisitions/{id}/cancel",
    params(("id" = Uuid, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "Requisition cancelled"),
        (status = 422, description = "Already terminal", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn cancel_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .requisitions
        .cancel_requisition(CancelRequisitionCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Cancelled" })))
}

/// Convert an approved requisition into a draft purchase order
#[utoipa::path(
    post,
    path = "/api/v1/requisitions/{id}/convert",
    params(("id" = Uuid, Path, description = "Requisition id")),
    request_body = ConvertRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 422, description = "Not approved or already converted", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn convert_requisition(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .services
        .requisitions
        .convert_requisition(ConvertRequisitionCommand {
            id,
            tenant_id: ctx.tenant_id,
            actor_id: ctx.actor_id,
            supplier_id: payload.supplier_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(json!({
        "purchase_order_id": result.purchase_order_id,
        "po_number": result.po_number,
        "total_amount": result.total_amount,
    })))
}

pub fn requisition_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_requisition).get(list_requisitions))
        .route("/:id", get(get_requisition))
        .route("/:id/submit", post(submit_requisition))
        .route("/:id/approve", post(approve_requisition))
        .route("/:id/reject", post(reject_requisition))
        .route("/:id/cancel", post(cancel_requisition))
        .route("/:id/convert", post(convert_requisition))
}
