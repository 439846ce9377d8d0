pub mod audit;
pub mod auth;
pub mod email;
pub mod events;
pub mod notifications;
pub mod pages;
pub mod sessions;
pub mod users;
