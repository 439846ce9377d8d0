mod view;
mod view_model;

pub use view::InventoryItemDetails;
pub use view_model::InventoryItemDetailsVm;
