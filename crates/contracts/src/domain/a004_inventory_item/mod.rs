pub mod aggregate;

pub use aggregate::{AdjustStockRequest, InventoryItem, InventoryItemDto, InventoryItemId};
