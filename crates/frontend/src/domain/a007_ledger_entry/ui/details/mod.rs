mod view;
mod view_model;

pub use view::LedgerEntryDetails;
pub use view_model::LedgerEntryDetailsVm;
