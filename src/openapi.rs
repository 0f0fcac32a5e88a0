use utoipa::OpenApi;

use crate::entities::{
    inventory_record::StockCondition,
    purchase_order::{PaymentStatus, PurchaseOrderStatus},
    requisition::{RequisitionPriority, RequisitionStatus},
    supplier::SupplierStatus,
    tender::{TenderStatus, TenderType},
};
use crate::handlers;

/// OpenAPI document for the procurement API, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Supplyline API",
        description = "Procurement workflow API: requisitions, purchase orders, \
                       goods receipt, inventory, automated reordering, and tenders."
    ),
    paths(
        handlers::requisitions::create_requisition,
        handlers::requisitions::list_requisitions,
        handlers::requisitions::get_requisition,
        handlers::requisitions::submit_requisition,
        handlers::requisitions::approve_requisition,
        handlers::requisitions::reject_requisition,
        handlers::requisitions::cancel_requisition,
        handlers::requisitions::convert_requisition,
        handlers::inventory::list_inventory,
        handlers::inventory::list_low_stock,
        handlers::inventory::list_out_of_stock,
        handlers::inventory::get_inventory_record,
        handlers::inventory::adjust_inventory,
        handlers::inventory::list_adjustments,
        handlers::inventory::transfer_inventory,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        RequisitionStatus,
        RequisitionPriority,
        PurchaseOrderStatus,
        PaymentStatus,
        StockCondition,
        SupplierStatus,
        TenderStatus,
        TenderType,
        handlers::requisitions::CreateRequisitionRequest,
        handlers::requisitions::RequisitionLineDto,
        handlers::requisitions::ApproveRequest,
        handlers::requisitions::RejectRequest,
        handlers::requisitions::ConvertRequest,
        handlers::purchase_orders::CreatePurchaseOrderRequest,
        handlers::purchase_orders::PurchaseOrderLineDto,
        handlers::purchase_orders::ReceiveGoodsRequest,
        handlers::purchase_orders::ReceiptLineDto,
        handlers::purchase_orders::RecordPaymentRequest,
        handlers::purchase_orders::RejectPurchaseOrderRequest,
        handlers::purchase_orders::CancelPurchaseOrderRequest,
        handlers::inventory::AdjustInventoryRequest,
        handlers::inventory::TransferInventoryRequest,
        handlers::suppliers::RateSupplierRequest,
        handlers::tenders::CreateTenderRequest,
        handlers::tenders::SubmitBidRequest,
        handlers::tenders::ScoreBidRequest,
        handlers::tenders::AwardTenderRequest,
    )),
    tags(
        (name = "requisitions", description = "Requisition ledger"),
        (name = "purchase-orders", description = "Purchase order workflow and goods receipt"),
        (name = "inventory", description = "Inventory ledger"),
        (name = "suppliers", description = "Supplier registry and ratings"),
        (name = "warehouses", description = "Warehouse registry"),
        (name = "reorder-rules", description = "Automated reordering engine"),
        (name = "tenders", description = "Tender and bid workflow"),
    )
)]
pub struct ApiDoc;
