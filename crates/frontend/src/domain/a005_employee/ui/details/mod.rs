mod view;
mod view_model;

pub use view::EmployeeDetails;
pub use view_model::EmployeeDetailsVm;
