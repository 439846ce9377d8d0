pub mod audit;
pub mod auth;
pub mod email;
pub mod notifications;
pub mod users;
