use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Sender half of the in-process domain event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Domain events emitted by the procurement workflow.
///
/// Delivery to external systems (supplier notification, reporting) is the
/// concern of whatever consumes the channel; the core only emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Requisition events
    RequisitionCreated(Uuid),
    RequisitionSubmitted(Uuid),
    RequisitionApproved(Uuid),
    RequisitionRejected(Uuid),
    RequisitionCancelled(Uuid),
    RequisitionConverted {
        requisition_id: Uuid,
        purchase_order_id: Uuid,
    },

    // Purchase order events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderSubmitted(Uuid),
    PurchaseOrderApproved(Uuid),
    PurchaseOrderRejected(Uuid),
    PurchaseOrderSent(Uuid),
    PurchaseOrderConfirmed(Uuid),
    PurchaseOrderCancelled {
        purchase_order_id: Uuid,
        reason: String,
    },
    GoodsReceived {
        purchase_order_id: Uuid,
        goods_receipt_id: Uuid,
        fully_delivered: bool,
    },
    PurchaseOrderInvoiced(Uuid),
    PurchaseOrderPaid {
        purchase_order_id: Uuid,
        amount: Decimal,
    },
    PurchaseOrderCompleted(Uuid),

    // Inventory events
    InventoryAdjusted {
        inventory_id: Uuid,
        old_quantity: i32,
        new_quantity: i32,
        reason: String,
    },
    InventoryTransferred {
        product_id: Uuid,
        from_warehouse_id: Uuid,
        to_warehouse_id: Uuid,
        quantity: i32,
    },

    // Reordering events
    ReorderTriggered {
        rule_id: Uuid,
        product_id: Uuid,
        warehouse_id: Uuid,
        reorder_quantity: i32,
        auto_approved: bool,
    },

    // Tender events
    TenderPublished(Uuid),
    BidSubmitted {
        tender_id: Uuid,
        bid_id: Uuid,
    },
    BidScored {
        bid_id: Uuid,
        total_score: Decimal,
    },
    TenderAwarded {
        tender_id: Uuid,
        winning_bid_id: Uuid,
        purchase_order_id: Uuid,
    },

    // Supplier events
    SupplierRated {
        supplier_id: Uuid,
        rating: i16,
        new_average: Decimal,
    },

    // Generic
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// Consumes the event channel and logs each event.
///
/// Runs until every `EventSender` is dropped. External delivery (webhooks,
/// email, message bus) would hang off this loop; it is out of scope here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
    info!("event channel closed, stopping event processor");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();
        sender.send(Event::RequisitionCreated(id)).await.unwrap();
        match rx.recv().await {
            Some(Event::RequisitionCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender
            .send(Event::PurchaseOrderCreated(Uuid::new_v4()))
            .await
            .is_err());
    }
}
