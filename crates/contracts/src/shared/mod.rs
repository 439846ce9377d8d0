pub mod duplicates;
pub mod events;
pub mod indicators;
pub mod list;
pub mod metrics;
pub mod validation;
