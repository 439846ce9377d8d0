pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod format;
