// Workflow services
pub mod purchase_orders;
pub mod requisitions;
pub mod tenders;

// Stock management
pub mod inventory;
pub mod reordering;

// Master data
pub mod suppliers;
pub mod warehouses;

// Financial
pub mod payments;

use crate::{config::AppConfig, db::DbPool, events::EventSender};
use std::sync::Arc;

/// Bundle of all domain services sharing one pool and event channel.
#[derive(Clone)]
pub struct AppServices {
    pub requisitions: requisitions::RequisitionService,
    pub purchase_orders: purchase_orders::PurchaseOrderService,
    pub inventory: inventory::InventoryService,
    pub reordering: reordering::ReorderingService,
    pub suppliers: suppliers::SupplierService,
    pub warehouses: warehouses::WarehouseService,
    pub tenders: tenders::TenderService,
    pub payments: payments::PaymentService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        Self {
            requisitions: requisitions::RequisitionService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            purchase_orders: purchase_orders::PurchaseOrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            inventory: inventory::InventoryService::new(db_pool.clone(), event_sender.clone()),
            reordering: reordering::ReorderingService::new(db_pool.clone(), event_sender.clone()),
            suppliers: suppliers::SupplierService::new(db_pool.clone(), event_sender.clone()),
            warehouses: warehouses::WarehouseService::new(db_pool.clone()),
            tenders: tenders::TenderService::new(db_pool.clone(), event_sender.clone()),
            payments: payments::PaymentService::new(db_pool, event_sender, config),
        }
    }
}
