pub mod adjust_inventory_command;
pub mod transfer_inventory_command;

pub use adjust_inventory_command::AdjustInventoryCommand;
pub use transfer_inventory_command::TransferInventoryCommand;
