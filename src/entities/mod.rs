pub mod bid;
pub mod goods_receipt;
pub mod goods_receipt_line;
pub mod inventory_record;
pub mod purchase_order;
pub mod purchase_order_line;
pub mod reorder_rule;
pub mod requisition;
pub mod requisition_line;
pub mod stock_adjustment;
pub mod supplier;
pub mod supplier_rating;
pub mod tender;
pub mod warehouse;
