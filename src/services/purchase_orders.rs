use crate::{
    commands::purchaseorders::{
        create_purchase_order_command::CreatePurchaseOrderResult,
        receive_goods_command::ReceiveGoodsResult, ApprovePurchaseOrderCommand,
        CancelPurchaseOrderCommand, CompletePurchaseOrderCommand, ConfirmPurchaseOrderCommand,
        CreatePurchaseOrderCommand, ReceiveGoodsCommand, RecordInvoiceCommand,
        RecordPaymentCommand, RejectPurchaseOrderCommand, SendPurchaseOrderCommand,
        SubmitPurchaseOrderCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{goods_receipt, goods_receipt_line, purchase_order, purchase_order_line},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the purchase order workflow, goods receipt included.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_purchase_order(
        &self,
        command: CreatePurchaseOrderCommand,
    ) -> Result<CreatePurchaseOrderResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn submit_purchase_order(
        &self,
        command: SubmitPurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn approve_purchase_order(
        &self,
        command: ApprovePurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn reject_purchase_order(
        &self,
        command: RejectPurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_purchase_order(
        &self,
        command: SendPurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn confirm_purchase_order(
        &self,
        command: ConfirmPurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn receive_goods(
        &self,
        command: ReceiveGoodsCommand,
    ) -> Result<ReceiveGoodsResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn record_invoice(&self, command: RecordInvoiceCommand) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        command: RecordPaymentCommand,
    ) -> Result<purchase_order::PaymentStatus, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn complete_purchase_order(
        &self,
        command: CompletePurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_purchase_order(
        &self,
        command: CancelPurchaseOrderCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_line::Model>), ServiceError> {
        let db = &*self.db_pool;
        let po = purchase_order::Entity::find_by_id(id)
            .filter(purchase_order::Column::TenantId.eq(tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {}", id)))?;
        let lines = purchase_order_line::Entity::find()
            .filter(purchase_order_line::Column::PurchaseOrderId.eq(id))
            .all(db)
            .await?;
        Ok((po, lines))
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        tenant_id: Uuid,
        status: Option<purchase_order::PurchaseOrderStatus>,
        supplier_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = purchase_order::Entity::find()
            .filter(purchase_order::Column::TenantId.eq(tenant_id))
            .order_by_desc(purchase_order::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
        }
        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// All receipts recorded against an order, newest first.
    #[instrument(skip(self))]
    pub async fn list_goods_receipts(
        &self,
        tenant_id: Uuid,
        purchase_order_id: Uuid,
    ) -> Result<Vec<(goods_receipt::Model, Vec<goods_receipt_line::Model>)>, ServiceError> {
        let db = &*self.db_pool;
        // Tenant scoping rides on the parent order.
        purchase_order::Entity::find_by_id(purchase_order_id)
            .filter(purchase_order::Column::TenantId.eq(tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {}", purchase_order_id))
            })?;

        let receipts = goods_receipt::Entity::find()
            .filter(goods_receipt::Column::PurchaseOrderId.eq(purchase_order_id))
            .order_by_desc(goods_receipt::Column::ReceivedDate)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(receipts.len());
        for receipt in receipts {
            let lines = goods_receipt_line::Entity::find()
                .filter(goods_receipt_line::Column::GoodsReceiptId.eq(receipt.id))
                .all(db)
                .await?;
            out.push((receipt, lines));
        }
        Ok(out)
    }
}
