//! Общие шаги после успешной записи агрегата

use contracts::shared::events::ChangeAction;
use contracts::system::audit::AuditAction;

use crate::shared::events;
use crate::system::audit::service as audit;
use crate::system::auth::extractor::Actor;

fn change_action(action: AuditAction) -> ChangeAction {
    match action {
        AuditAction::Create => ChangeAction::Created,
        AuditAction::Delete => ChangeAction::Deleted,
        _ => ChangeAction::Updated,
    }
}

/// Записать изменение в журнал аудита и оповестить подписчиков
pub async fn record_change(
    actor: &Actor,
    collection: &str,
    id: &str,
    action: AuditAction,
    details: Option<String>,
) {
    audit::record(actor, action, collection, Some(id), details).await;
    events::publish(collection, Some(id.to_string()), change_action(action));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_actions_map_to_change_events() {
        assert_eq!(change_action(AuditAction::Create), ChangeAction::Created);
        assert_eq!(change_action(AuditAction::Delete), ChangeAction::Deleted);
        assert_eq!(change_action(AuditAction::Payment), ChangeAction::Updated);
        assert_eq!(change_action(AuditAction::StatusChange), ChangeAction::Updated);
    }
}
