use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    commands::purchaseorders::{
        ApprovePurchaseOrderCommand, CancelPurchaseOrderCommand, CompletePurchaseOrderCommand,
        ConfirmPurchaseOrderCommand, CreatePurchaseOrderCommand, PurchaseOrderLineRequest,
        ReceiptLineRequest, ReceiveGoodsCommand, RecordInvoiceCommand, RecordPaymentCommand,
        RejectPurchaseOrderCommand, SendPurchaseOrderCommand, SubmitPurchaseOrderCommand,
    },
    context::RequestContext,
    entities::purchase_order::PurchaseOrderStatus,
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
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, serde::Serialize, Validate, ToSchema)]
pub struct PurchaseOrderLineDto {
    pub product_id: Uuid,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Uuid,
    #[validate(length(min = 1))]
    pub lines: Vec<PurchaseOrderLineDto>,
    pub expected_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub tax_amount: Decimal,
    pub currency: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectPurchaseOrderRequest {
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelPurchaseOrderRequest {
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, serde::Serialize, Validate, ToSchema)]
pub struct ReceiptLineDto {
    pub purchase_order_line_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReceiveGoodsRequest {
    pub warehouse_id: Uuid,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub lines: Vec<ReceiptLineDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseOrderListQuery {
    pub status: Option<PurchaseOrderStatus>,
    pub supplier_id: Option<Uuid>,
}

async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreatePurchaseOrderCommand {
        tenant_id: ctx.tenant_id,
        created_by: ctx.actor_id,
        supplier_id: payload.supplier_id,
        lines: payload
            .lines
            .into_iter()
            .map(|l| PurchaseOrderLineRequest {
                product_id: l.product_id,
                description: l.description,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
        expected_delivery_date: payload.expected_delivery_date,
        tax_amount: payload.tax_amount,
        currency: payload.currency,
        notes: payload.notes,
    };

    let result = state
        .services
        .purchase_orders
        .create_purchase_order(command)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(json!({
        "id": result.id,
        "po_number": result.po_number,
        "total_amount": result.total_amount,
        "grand_total": result.grand_total,
    })))
}

async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (po, lines) = state
        .services
        .purchase_orders
        .get_purchase_order(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "purchase_order": po,
        "lines": lines,
    })))
}

async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<PurchaseOrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .purchase_orders
        .list_purchase_orders(
            ctx.tenant_id,
            query.status,
            query.supplier_id,
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

async fn submit_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .submit_purchase_order(SubmitPurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(
        json!({ "id": id, "status": "PendingApproval" }),
    ))
}

async fn approve_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .approve_purchase_order(ApprovePurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
            approver_id: ctx.actor_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Approved" })))
}

async fn reject_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .purchase_orders
        .reject_purchase_order(RejectPurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
            rejector_id: ctx.actor_id,
            reason: payload.reason,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Rejected" })))
}

async fn send_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .send_purchase_order(SendPurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Sent" })))
}

async fn confirm_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .confirm_purchase_order(ConfirmPurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Confirmed" })))
}

async fn receive_goods(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiveGoodsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let result = state
        .services
        .purchase_orders
        .receive_goods(ReceiveGoodsCommand {
            id,
            tenant_id: ctx.tenant_id,
            received_by: ctx.actor_id,
            warehouse_id: payload.warehouse_id,
            notes: payload.notes,
            lines: payload
                .lines
                .into_iter()
                .map(|l| ReceiptLineRequest {
                    purchase_order_line_id: l.purchase_order_line_id,
                    quantity: l.quantity,
                })
                .collect(),
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(json!({
        "goods_receipt_id": result.goods_receipt_id,
        "grn_number": result.grn_number,
        "status": result.status,
        "fully_delivered": result.fully_delivered,
    })))
}

async fn list_goods_receipts(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let receipts = state
        .services
        .purchase_orders
        .list_goods_receipts(ctx.tenant_id, id)
        .await
        .map_err(map_service_error)?;
    let body: Vec<_> = receipts
        .into_iter()
        .map(|(receipt, lines)| json!({ "receipt": receipt, "lines": lines }))
        .collect();
    Ok(success_response(body))
}

async fn record_invoice(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .record_invoice(RecordInvoiceCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Invoiced" })))
}

async fn record_payment(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_status = state
        .services
        .purchase_orders
        .record_payment(RecordPaymentCommand {
            id,
            tenant_id: ctx.tenant_id,
            amount: payload.amount,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({
        "id": id,
        "payment_status": payment_status,
    })))
}

async fn complete_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .complete_purchase_order(CompletePurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Completed" })))
}

async fn cancel_purchase_order(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelPurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .purchase_orders
        .cancel_purchase_order(CancelPurchaseOrderCommand {
            id,
            tenant_id: ctx.tenant_id,
            reason: payload.reason,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "id": id, "status": "Cancelled" })))
}

pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_purchase_order).get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/submit", post(submit_purchase_order))
        .route("/:id/approve", post(approve_purchase_order))
        .route("/:id/reject", post(reject_purchase_order))
        .route("/:id/send", post(send_purchase_order))
        .route("/:id/confirm", post(confirm_purchase_order))
        .route("/:id/receipts", post(receive_goods).get(list_goods_receipts))
        .route("/:id/invoice", post(record_invoice))
        .route("/:id/payments", post(record_payment))
        .route("/:id/complete", post(complete_purchase_order))
        .route("/:id/cancel", post(cancel_purchase_order))
}
