pub mod aggregate;

pub use aggregate::{BlacklistRequest, Customer, CustomerDto, CustomerId};
