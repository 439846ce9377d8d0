use serde::{Deserialize, Serialize};

/// Вид изменения записи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
        }
    }
}

/// Событие об изменении данных, рассылаемое подписчикам в реальном времени.
///
/// Клиент не сливает изменения, а перечитывает коллекцию `entity` целиком.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Имя коллекции (например, "vehicle")
    pub entity: String,
    pub id: Option<String>,
    pub action: ChangeAction,
}

impl ChangeEvent {
    pub fn new(entity: &str, id: Option<String>, action: ChangeAction) -> Self {
        Self {
            entity: entity.to_string(),
            id,
            action,
        }
    }
}

/// Имя SSE-события для изменений данных
pub const CHANGE_EVENT_NAME: &str = "change";
