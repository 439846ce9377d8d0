//! Заголовки вкладок. Для агрегатов берутся из `AggregateRoot::list_name`.

use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a003_rental_contract::RentalContract;
use contracts::domain::a004_inventory_item::InventoryItem;
use contracts::domain::a005_employee::Employee;
use contracts::domain::a006_maintenance::MaintenanceRecord;
use contracts::domain::a007_ledger_entry::LedgerEntry;
use contracts::domain::common::AggregateRoot;

/// Префикс ключа вкладки печатной формы договора
pub const CONTRACT_PRINT_PREFIX: &str = "a003_rental_contract_print_";

pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        // ── Aggregates ───────────────────────────────────────────────────
        "a001_customer" => Customer::list_name(),
        "a002_vehicle" => Vehicle::list_name(),
        "a003_rental_contract" => RentalContract::list_name(),
        "a004_inventory_item" => InventoryItem::list_name(),
        "a005_employee" => Employee::list_name(),
        "a006_maintenance" => MaintenanceRecord::list_name(),
        "a007_ledger_entry" => LedgerEntry::list_name(),

        // ── Dashboards (d4xx) ────────────────────────────────────────────
        "d400_fleet_analytics" => "Доходность автопарка",
        "d401_executive_kpi" => "Ключевые показатели",
        "d402_tax_summary" => "Налоги",
        "d403_security_overview" => "Безопасность",

        // ── System ───────────────────────────────────────────────────────
        "sys_users" => "Пользователи",
        "sys_sessions" => "Активные сессии",
        "sys_audit" => "Журнал действий",
        "sys_notifications" => "Уведомления",
        "sys_email" => "Отправка письма",

        _ => "",
    }
}

/// Заголовок для любого ключа, включая составные (печать договора)
pub fn tab_title_for_key(key: &str) -> String {
    if let Some(id) = key.strip_prefix(CONTRACT_PRINT_PREFIX) {
        return detail_tab_label(RentalContract::element_name(), short_id(id));
    }
    match tab_label_for_key(key) {
        "" => key.to_string(),
        label => label.to_string(),
    }
}

/// «<entity> · <identifier>»
pub fn detail_tab_label(entity_label: &str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_labels_come_from_contracts() {
        assert_eq!(tab_label_for_key("a001_customer"), "Клиенты");
        assert_eq!(tab_label_for_key("a002_vehicle"), "Автопарк");
        assert_eq!(tab_label_for_key("unknown"), "");
    }

    #[test]
    fn composite_keys_get_detail_titles() {
        assert_eq!(
            tab_title_for_key("a003_rental_contract_print_1234567890ab"),
            "Договор аренды · 12345678"
        );
        assert_eq!(tab_title_for_key("sys_audit"), "Журнал действий");
        assert_eq!(tab_title_for_key("weird_key"), "weird_key");
    }
}
