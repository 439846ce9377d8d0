pub mod api;
pub mod ui;

pub const COLLECTION: &str = "inventory_item";
