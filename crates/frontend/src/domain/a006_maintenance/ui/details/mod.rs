mod view;
mod view_model;

pub use view::MaintenanceDetails;
pub use view_model::MaintenanceDetailsVm;
