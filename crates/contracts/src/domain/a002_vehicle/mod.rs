pub mod aggregate;

pub use aggregate::{
    SetStatusRequest, Vehicle, VehicleCategory, VehicleDto, VehicleId, VehicleStatus,
};
