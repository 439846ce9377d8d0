pub mod aggregate;

pub use aggregate::{
    MaintenanceDto, MaintenanceId, MaintenanceKind, MaintenanceRecord, MAINTENANCE_LEDGER_CATEGORY,
};
