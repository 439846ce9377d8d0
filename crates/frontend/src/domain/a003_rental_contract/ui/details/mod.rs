mod view;
mod view_model;

pub use view::RentalContractDetails;
pub use view_model::RentalContractDetailsVm;
