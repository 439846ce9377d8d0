use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::system::auth;

/// Конфигурация системных роутов приложения
pub fn configure_system_routes() -> Router {
    Router::new()
        // ========================================
        // HEALTH CHECK
        // ========================================
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/system/auth/login", post(handlers::auth::login))
        .route("/api/system/auth/refresh", post(handlers::auth::refresh))
        .route("/api/system/auth/logout", post(handlers::auth::logout))
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(handlers::auth::current_user)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        // ========================================
        // SYSTEM USERS MANAGEMENT (admin only)
        // ========================================
        .route(
            "/api/system/users",
            get(handlers::users::list)
                .post(handlers::users::create)
                .layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(handlers::users::get_by_id)
                .put(handlers::users::update)
                .delete(handlers::users::delete)
                .layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(handlers::users::change_password)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        // ========================================
        // SESSIONS & AUDIT
        // ========================================
        .route(
            "/api/system/sessions",
            get(handlers::sessions::list).layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/system/sessions/:id",
            delete(handlers::sessions::revoke)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/system/audit",
            get(handlers::audit::list).layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        // ========================================
        // EMAIL (admin only)
        // ========================================
        .route(
            "/api/system/email",
            post(handlers::email::send).layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        // ========================================
        // NOTIFICATIONS
        // ========================================
        .route(
            "/api/notifications",
            get(handlers::notifications::list)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/notifications/check",
            post(handlers::notifications::check)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/notifications/:id",
            delete(handlers::notifications::delete)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        // ========================================
        // REAL-TIME EVENTS (SSE)
        // ========================================
        .route(
            "/api/events",
            get(handlers::events::stream).layer(middleware::from_fn(auth::middleware::require_auth)),
        )
}
