pub mod a001_customer;
pub mod a002_vehicle;
pub mod a003_rental_contract;
pub mod a004_inventory_item;
pub mod a005_employee;
pub mod a006_maintenance;
pub mod a007_ledger_entry;
