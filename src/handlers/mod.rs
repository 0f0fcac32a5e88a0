pub mod common;
pub mod health;
pub mod inventory;
pub mod purchase_orders;
pub mod reorder_rules;
pub mod requisitions;
pub mod suppliers;
pub mod tenders;
pub mod warehouses;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
