mod view;
mod view_model;

pub use view::VehicleDetails;
pub use view_model::VehicleDetailsVm;
