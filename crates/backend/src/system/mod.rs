pub mod api;
pub mod audit;
pub mod auth;
pub mod email;
pub mod initialization;
pub mod middleware;
pub mod notifications;
pub mod sessions;
pub mod tracing;
pub mod users;
