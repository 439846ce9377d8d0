use contracts::system::audit::{AuditAction, AuditEntry, AuditQuery};

use super::repository::{self, NewAuditEntry};
use crate::system::auth::extractor::Actor;

/// Записать действие в журнал аудита.
///
/// Сбой записи не отменяет уже выполненное изменение, он только логируется.
pub async fn record(
    actor: &Actor,
    action: AuditAction,
    entity: &str,
    entity_id: Option<&str>,
    details: Option<String>,
) {
    let entry = NewAuditEntry {
        user_id: actor.user_id.as_deref(),
        username: actor.username.as_deref(),
        action,
        entity,
        entity_id,
        details,
        ip_address: actor.ip_address.as_deref(),
    };
    if let Err(e) = repository::insert(entry).await {
        tracing::error!(
            "Audit write failed ({} {} {:?}): {:#}",
            action.as_str(),
            entity,
            entity_id,
            e
        );
    }
}

pub async fn list(query: &AuditQuery) -> anyhow::Result<Vec<AuditEntry>> {
    repository::list(query).await
}

/// Последние события безопасности за окно
pub async fn security_events(since: &str, limit: u64) -> anyhow::Result<Vec<AuditEntry>> {
    let actions: Vec<AuditAction> = AuditAction::ALL
        .into_iter()
        .filter(AuditAction::is_security)
        .collect();
    repository::list_actions_since(&actions, since, limit).await
}
