use super::repository;
use chrono::NaiveDate;
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerEntryDto, LedgerKind, LedgerSummary};
use contracts::domain::common::AggregateRoot;
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    LedgerEntry::collection_name()
}

/// Ручная проводка
pub async fn create(dto: LedgerEntryDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let mut aggregate = LedgerEntry::new_for_insert(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(format!("{} {:.2}", aggregate.kind.label(), aggregate.amount)),
    )
    .await;
    Ok(id)
}

pub async fn update(dto: LedgerEntryDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Проводка", &raw_id))?;
    if aggregate.reference.is_some() {
        return Err(ServiceError::validation(
            "Автоматическая проводка меняется только через исходную операцию",
        )
        .into());
    }

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    Ok(())
}

pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<LedgerEntry>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<LedgerEntry>> {
    repository::list_all().await
}

/// Поиск по категории, виду и ссылке, новые проводки первыми
pub async fn list(query: &ListQuery) -> anyhow::Result<ListResponse<LedgerEntry>> {
    let mut entries = repository::list_all().await?;
    entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    Ok(query.apply(entries, |e| {
        vec![
            e.category.clone(),
            e.kind.label().to_string(),
            e.entry_date.to_string(),
            e.reference.clone().unwrap_or_default(),
        ]
    }))
}

pub async fn list_filtered(
    kind: Option<LedgerKind>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<Vec<LedgerEntry>> {
    repository::list_filtered(kind, from, to).await
}

/// Итоги доходов и расходов за период
pub async fn summary(from: Option<NaiveDate>, to: Option<NaiveDate>) -> anyhow::Result<LedgerSummary> {
    let entries = repository::list_filtered(None, from, to).await?;
    Ok(LedgerSummary::from_entries(&entries))
}
