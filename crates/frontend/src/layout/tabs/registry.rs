//! Tab content registry: tab.key → View

use super::tab_labels::CONTRACT_PRINT_PREFIX;
use crate::dashboards::d400_fleet_analytics::ui::FleetAnalyticsDashboard;
use crate::dashboards::d401_executive_kpi::ui::ExecutiveKpiDashboard;
use crate::dashboards::d402_tax_summary::ui::TaxSummaryDashboard;
use crate::dashboards::d403_security_overview::ui::SecurityOverviewDashboard;
use crate::domain::a001_customer::ui::list::CustomerList;
use crate::domain::a002_vehicle::ui::list::VehicleList;
use crate::domain::a003_rental_contract::ui::list::RentalContractList;
use crate::domain::a003_rental_contract::ui::print::ContractPrintView;
use crate::domain::a004_inventory_item::ui::list::InventoryItemList;
use crate::domain::a005_employee::ui::list::EmployeeList;
use crate::domain::a006_maintenance::ui::list::MaintenanceList;
use crate::domain::a007_ledger_entry::ui::list::LedgerEntryList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::audit::ui::AuditLogList;
use crate::system::auth::guard::RequireAdmin;
use crate::system::email::ui::EmailComposer;
use crate::system::notifications::ui::NotificationsList;
use crate::system::sessions::ui::SessionsList;
use crate::system::users::ui::list::UsersList;
use leptos::prelude::*;

pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    match key {
        // ── Aggregates ───────────────────────────────────────────────────
        "a001_customer" => view! { <CustomerList /> }.into_any(),
        "a002_vehicle" => view! { <VehicleList /> }.into_any(),
        "a003_rental_contract" => view! { <RentalContractList /> }.into_any(),
        k if k.starts_with(CONTRACT_PRINT_PREFIX) => {
            let id = k.trim_start_matches(CONTRACT_PRINT_PREFIX).to_string();
            let key_for_close = k.to_string();
            view! {
                <ContractPrintView
                    id=id
                    on_close=Callback::new(move |_| tabs_store.close_tab(&key_for_close))
                />
            }
            .into_any()
        }
        "a004_inventory_item" => view! { <InventoryItemList /> }.into_any(),
        "a005_employee" => view! { <EmployeeList /> }.into_any(),
        "a006_maintenance" => view! { <MaintenanceList /> }.into_any(),
        "a007_ledger_entry" => view! { <LedgerEntryList /> }.into_any(),

        // ── Dashboards ───────────────────────────────────────────────────
        "d400_fleet_analytics" => view! { <FleetAnalyticsDashboard /> }.into_any(),
        "d401_executive_kpi" => view! { <ExecutiveKpiDashboard /> }.into_any(),
        "d402_tax_summary" => view! { <TaxSummaryDashboard /> }.into_any(),
        "d403_security_overview" => {
            view! { <RequireAdmin><SecurityOverviewDashboard /></RequireAdmin> }.into_any()
        }

        // ── System ───────────────────────────────────────────────────────
        "sys_users" => view! { <RequireAdmin><UsersList /></RequireAdmin> }.into_any(),
        "sys_sessions" => view! { <SessionsList /> }.into_any(),
        "sys_audit" => view! { <RequireAdmin><AuditLogList /></RequireAdmin> }.into_any(),
        "sys_notifications" => view! { <NotificationsList /> }.into_any(),
        "sys_email" => view! { <RequireAdmin><EmailComposer /></RequireAdmin> }.into_any(),

        _ => {
            log::warn!("Unknown tab key: {}", key);
            view! { <div class="placeholder">"Раздел не найден"</div> }.into_any()
        }
    }
}
