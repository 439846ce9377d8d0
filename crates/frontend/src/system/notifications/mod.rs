pub mod api;
pub mod bell;
pub mod ui;

use contracts::system::notifications::{NotificationKind, Severity};

/// Коллекция, которой backend помечает события об уведомлениях
pub const ENTITY: &str = "notification";

pub fn kind_label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::InsuranceExpiring => "Страховка",
        NotificationKind::RegistrationExpiring => "Регистрация",
        NotificationKind::ServiceDue => "Плановое ТО",
        NotificationKind::ContractOverdue => "Просрочка возврата",
        NotificationKind::LowStock => "Мало на складе",
        NotificationKind::LicenseExpired => "Права просрочены",
    }
}

pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "badge badge--neutral",
        Severity::Warning => "badge badge--warning",
        Severity::Critical => "badge badge--error",
    }
}

/// Вкладка, где живёт запись, о которой уведомление
pub fn entity_tab(entity: &str) -> Option<&'static str> {
    match entity {
        "vehicle" => Some("a002_vehicle"),
        "rental_contract" => Some("a003_rental_contract"),
        "inventory_item" => Some("a004_inventory_item"),
        "customer" => Some("a001_customer"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_label() {
        for kind in NotificationKind::ALL {
            assert!(!kind_label(kind).is_empty());
        }
    }

    #[test]
    fn entity_tabs() {
        assert_eq!(entity_tab("vehicle"), Some("a002_vehicle"));
        assert_eq!(entity_tab("unknown"), None);
    }
}
