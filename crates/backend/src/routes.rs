use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    let business = Router::new()
        // ========================================
        // A001 CUSTOMER
        // ========================================
        .route(
            "/api/customer",
            get(handlers::a001_customer::list_all).post(handlers::a001_customer::upsert),
        )
        .route("/api/customer/list", get(handlers::a001_customer::list))
        .route(
            "/api/customer/duplicates",
            get(handlers::a001_customer::duplicates),
        )
        .route(
            "/api/customer/:id",
            get(handlers::a001_customer::get_by_id).delete(handlers::a001_customer::delete),
        )
        .route(
            "/api/customer/:id/blacklist",
            post(handlers::a001_customer::set_blacklist),
        )
        // ========================================
        // A002 VEHICLE
        // ========================================
        .route(
            "/api/vehicle",
            get(handlers::a002_vehicle::list_all).post(handlers::a002_vehicle::upsert),
        )
        .route("/api/vehicle/list", get(handlers::a002_vehicle::list))
        .route(
            "/api/vehicle/available",
            get(handlers::a002_vehicle::available),
        )
        .route(
            "/api/vehicle/:id",
            get(handlers::a002_vehicle::get_by_id).delete(handlers::a002_vehicle::delete),
        )
        .route(
            "/api/vehicle/:id/status",
            post(handlers::a002_vehicle::set_status),
        )
        // ========================================
        // A003 RENTAL CONTRACT
        // ========================================
        .route(
            "/api/rental_contract",
            get(handlers::a003_rental_contract::list).post(handlers::a003_rental_contract::upsert),
        )
        .route(
            "/api/rental_contract/list",
            get(handlers::a003_rental_contract::list),
        )
        .route(
            "/api/rental_contract/:id",
            get(handlers::a003_rental_contract::get_by_id)
                .delete(handlers::a003_rental_contract::delete),
        )
        .route(
            "/api/rental_contract/:id/complete",
            post(handlers::a003_rental_contract::complete),
        )
        .route(
            "/api/rental_contract/:id/cancel",
            post(handlers::a003_rental_contract::cancel),
        )
        .route(
            "/api/rental_contract/:id/payment",
            post(handlers::a003_rental_contract::record_payment),
        )
        .route(
            "/api/rental_contract/:id/email",
            post(handlers::a003_rental_contract::send_summary),
        )
        // ========================================
        // A004 INVENTORY
        // ========================================
        .route(
            "/api/inventory_item",
            get(handlers::a004_inventory_item::list_all).post(handlers::a004_inventory_item::upsert),
        )
        .route(
            "/api/inventory_item/list",
            get(handlers::a004_inventory_item::list),
        )
        .route(
            "/api/inventory_item/low-stock",
            get(handlers::a004_inventory_item::low_stock),
        )
        .route(
            "/api/inventory_item/:id",
            get(handlers::a004_inventory_item::get_by_id)
                .delete(handlers::a004_inventory_item::delete),
        )
        .route(
            "/api/inventory_item/:id/adjust",
            post(handlers::a004_inventory_item::adjust),
        )
        // ========================================
        // A005 EMPLOYEE
        // ========================================
        .route(
            "/api/employee",
            get(handlers::a005_employee::list_all).post(handlers::a005_employee::upsert),
        )
        .route("/api/employee/list", get(handlers::a005_employee::list))
        .route("/api/employee/payroll", get(handlers::a005_employee::payroll))
        .route(
            "/api/employee/:id",
            get(handlers::a005_employee::get_by_id).delete(handlers::a005_employee::delete),
        )
        // ========================================
        // A006 MAINTENANCE
        // ========================================
        .route(
            "/api/maintenance",
            get(handlers::a006_maintenance::list).post(handlers::a006_maintenance::upsert),
        )
        .route("/api/maintenance/list", get(handlers::a006_maintenance::list))
        .route(
            "/api/maintenance/:id",
            get(handlers::a006_maintenance::get_by_id).delete(handlers::a006_maintenance::delete),
        )
        // ========================================
        // A007 LEDGER
        // ========================================
        .route(
            "/api/ledger_entry",
            get(handlers::a007_ledger_entry::list).post(handlers::a007_ledger_entry::upsert),
        )
        .route("/api/ledger_entry/list", get(handlers::a007_ledger_entry::list_page))
        .route(
            "/api/ledger_entry/summary",
            get(handlers::a007_ledger_entry::summary),
        )
        .route(
            "/api/ledger_entry/:id",
            get(handlers::a007_ledger_entry::get_by_id).delete(handlers::a007_ledger_entry::delete),
        )
        // ========================================
        // EXPORT & DASHBOARDS
        // ========================================
        .route(
            "/api/export/:collection",
            get(handlers::export::export_csv),
        )
        .route(
            "/api/d400/fleet",
            get(handlers::d400_fleet_analytics::get_fleet_analytics),
        )
        .route(
            "/api/d401/kpi",
            get(handlers::d401_executive_kpi::get_executive_kpi),
        )
        .route(
            "/api/d402/tax",
            get(handlers::d402_tax_summary::get_tax_summary),
        )
        .layer(middleware::from_fn(system::auth::middleware::require_auth));

    let admin = Router::new()
        .route(
            "/api/d403/security",
            get(handlers::d403_security_overview::get_security_overview),
        )
        .layer(middleware::from_fn(system::auth::middleware::require_admin));

    Router::new()
        .merge(system::api::routes::configure_system_routes())
        .merge(business)
        .merge(admin)
}
