// Authentication handlers
pub mod auth;

// User management handlers
pub mod users;

// Sessions, audit
pub mod audit;
pub mod sessions;

// Notifications, email, real-time events
pub mod email;
pub mod events;
pub mod notifications;
