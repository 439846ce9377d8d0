use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    InsuranceExpiring,
    RegistrationExpiring,
    ServiceDue,
    ContractOverdue,
    LowStock,
    LicenseExpired,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 6] = [
        NotificationKind::InsuranceExpiring,
        NotificationKind::RegistrationExpiring,
        NotificationKind::ServiceDue,
        NotificationKind::ContractOverdue,
        NotificationKind::LowStock,
        NotificationKind::LicenseExpired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::InsuranceExpiring => "insurance_expiring",
            NotificationKind::RegistrationExpiring => "registration_expiring",
            NotificationKind::ServiceDue => "service_due",
            NotificationKind::ContractOverdue => "contract_overdue",
            NotificationKind::LowStock => "low_stock",
            NotificationKind::LicenseExpired => "license_expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NotificationKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Уведомление для сотрудников
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub entity: String,
    pub entity_id: String,
    pub created_at: String,
    pub read_at: Option<String>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckNotificationsResponse {
    /// Сколько новых уведомлений создано
    pub created: u32,
    pub unread_total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_matches_serde() {
        for kind in NotificationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
    }
}
