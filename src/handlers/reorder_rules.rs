use super::common::{created_response, map_service_error, no_content_response, success_response};
use crate::{
    context::RequestContext,
    errors::ApiError,
    handlers::AppState,
    services::reordering::CreateReorderRuleInput,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

async fn create_rule(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreateReorderRuleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let rule = state
        .services
        .reordering
        .create_rule(ctx.tenant_id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(rule))
}

async fn list_rules(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let rules = state
        .services
        .reordering
        .list_rules(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rules))
}

async fn deactivate_rule(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .reordering
        .deactivate_rule(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Runs a reorder sweep for the caller's tenant on demand; the scheduled
/// background sweep covers the usual case.
async fn run_check(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let actions = state
        .services
        .reordering
        .run_check(ctx.tenant_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(actions))
}

pub fn reorder_rule_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_rule).get(list_rules))
        .route("/check", post(run_check))
        .route("/:id", delete(deactivate_rule))
}
