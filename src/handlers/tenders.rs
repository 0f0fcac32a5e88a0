use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    commands::tenders::{
        AwardTenderCommand, CreateTenderCommand, PublishTenderCommand, ScoreBidCommand,
        SubmitBidCommand,
    },
    context::RequestContext,
    entities::tender::{TenderStatus, TenderType},
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenderRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub tender_type: TenderType,
    pub category: Option<String>,
    pub opening_date: DateTime<Utc>,
    pub closing_date: DateTime<Utc>,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitBidRequest {
    pub supplier_id: Uuid,
    pub total_amount: Decimal,
    #[validate(range(min = 1, max = 365))]
    pub validity_days: i32,
    pub proposal_document: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreBidRequest {
    pub technical_score: Decimal,
    pub financial_score: Decimal,
    pub evaluator_comments: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AwardTenderRequest {
    pub winning_bid_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TenderListQuery {
    pub status: Option<TenderStatus>,
}

async fn create_tender(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let tender = state
        .services
        .tenders
        .create_tender(CreateTenderCommand {
            tenant_id: ctx.tenant_id,
            title: payload.title,
            description: payload.description,
            tender_type: payload.tender_type,
            category: payload.category,
            opening_date: payload.opening_date,
            closing_date: payload.closing_date,
            budget: payload.budget,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(tender))
}

async fn get_tender(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tender = state
        .services
        .tenders
        .get_tender(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tender))
}

async fn list_tenders(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<TenderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .tenders
        .list_tenders(
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

/// Supplier-facing listing of tenders still open for bids.
async fn list_open_tenders(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .tenders
        .list_open_tenders(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

async fn publish_tender(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .tenders
        .publish_tender(PublishTenderCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Published" })))
}

async fn submit_bid(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let bid = state
        .services
        .tenders
        .submit_bid(SubmitBidCommand {
            tender_id: id,
            tenant_id: ctx.tenant_id,
            supplier_id: payload.supplier_id,
            total_amount: payload.total_amount,
            validity_days: payload.validity_days,
            proposal_document: payload.proposal_document,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(bid))
}

async fn list_bids(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bids = state
        .services
        .tenders
        .list_bids(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(bids))
}

async fn score_bid(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path((_tender_id, bid_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ScoreBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let total = state
        .services
        .tenders
        .score_bid(ScoreBidCommand {
            bid_id,
            tenant_id: ctx.tenant_id,
            technical_score: payload.technical_score,
            financial_score: payload.financial_score,
            evaluator_comments: payload.evaluator_comments,
            scored_by: ctx.actor_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "bid_id": bid_id,
        "total_score": total,
    })))
}

async fn award_tender(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AwardTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .services
        .tenders
        .award_tender(AwardTenderCommand {
            id,
            tenant_id: ctx.tenant_id,
            winning_bid_id: payload.winning_bid_id,
            actor_id: ctx.actor_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(json!({
        "tender_id": result.tender_id,
        "winning_bid_id": result.winning_bid_id,
        "purchase_order_id": result.purchase_order_id,
        "po_number": result.po_number,
    })))
}

pub fn tender_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_tender).get(list_tenders))
        .route("/open", get(list_open_tenders))
        .route("/:id", get(get_tender))
        .route("/:id/publish", post(publish_tender))
        .route("/:id/bids", post(submit_bid).get(list_bids))
        .route("/:id/bids/:bid_id/score", post(score_bid))
        .route("/:id/award", post(award_tender))
}
