use serde::{Deserialize, Serialize};

/// Действие, фиксируемое в журнале аудита
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
    StockAdjust,
    Payment,
    Export,
    EmailSent,
    LoginSuccess,
    LoginFailed,
    Logout,
    UserCreated,
    PasswordChanged,
    SessionRevoked,
}

impl AuditAction {
    pub const ALL: [AuditAction; 14] = [
        AuditAction::Create,
        AuditAction::Update,
        AuditAction::Delete,
        AuditAction::StatusChange,
        AuditAction::StockAdjust,
        AuditAction::Payment,
        AuditAction::Export,
        AuditAction::EmailSent,
        AuditAction::LoginSuccess,
        AuditAction::LoginFailed,
        AuditAction::Logout,
        AuditAction::UserCreated,
        AuditAction::PasswordChanged,
        AuditAction::SessionRevoked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::StatusChange => "status_change",
            AuditAction::StockAdjust => "stock_adjust",
            AuditAction::Payment => "payment",
            AuditAction::Export => "export",
            AuditAction::EmailSent => "email_sent",
            AuditAction::LoginSuccess => "login_success",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::Logout => "logout",
            AuditAction::UserCreated => "user_created",
            AuditAction::PasswordChanged => "password_changed",
            AuditAction::SessionRevoked => "session_revoked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        AuditAction::ALL.into_iter().find(|a| a.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::Create => "Создание",
            AuditAction::Update => "Изменение",
            AuditAction::Delete => "Удаление",
            AuditAction::StatusChange => "Смена статуса",
            AuditAction::StockAdjust => "Движение склада",
            AuditAction::Payment => "Оплата",
            AuditAction::Export => "Выгрузка",
            AuditAction::EmailSent => "Отправка письма",
            AuditAction::LoginSuccess => "Вход",
            AuditAction::LoginFailed => "Неудачный вход",
            AuditAction::Logout => "Выход",
            AuditAction::UserCreated => "Создан пользователь",
            AuditAction::PasswordChanged => "Смена пароля",
            AuditAction::SessionRevoked => "Сессия отозвана",
        }
    }

    /// Событие безопасности (попадает в ленту мониторинга)
    pub fn is_security(&self) -> bool {
        matches!(
            self,
            AuditAction::LoginSuccess
                | AuditAction::LoginFailed
                | AuditAction::Logout
                | AuditAction::UserCreated
                | AuditAction::PasswordChanged
                | AuditAction::SessionRevoked
        )
    }
}

/// Запись журнала аудита
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

/// Фильтр журнала аудита
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub entity: Option<String>,
    pub user: Option<String>,
    pub action: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_string_round_trip_covers_all() {
        for action in AuditAction::ALL {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("unknown"), None);
    }

    #[test]
    fn serde_name_matches_as_str() {
        let json = serde_json::to_string(&AuditAction::LoginFailed).unwrap();
        assert_eq!(json, "\"login_failed\"");
    }
}
