use super::repository;
use contracts::domain::a001_customer::{BlacklistRequest, Customer, CustomerDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::duplicates::{
    conflict_message, find_conflict_by, find_duplicates, DuplicateGroup, DuplicateKind,
};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    Customer::collection_name()
}

/// Телефон и удостоверение уникальны среди неудалённых клиентов
async fn ensure_unique(aggregate: &Customer) -> anyhow::Result<()> {
    let existing = repository::list_all().await?;
    let unique = |kind: DuplicateKind| matches!(kind, DuplicateKind::Phone | DuplicateKind::NationalId);
    if let Some((kind, owner)) = find_conflict_by(&existing, aggregate, unique) {
        return Err(ServiceError::conflict(conflict_message(kind, owner.full_name())));
    }
    Ok(())
}

/// Создание нового клиента
pub async fn create(dto: CustomerDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let mut aggregate = Customer::new_for_insert(&dto);

    // Валидация
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;

    // Before write
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(aggregate.full_name().to_string()),
    )
    .await;
    Ok(id)
}

/// Обновление существующего клиента
pub async fn update(dto: CustomerDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Клиент", &raw_id))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    Ok(())
}

/// Мягкое удаление клиента
pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Customer>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    repository::list_all().await
}

/// Поиск по ФИО, телефону, удостоверениям и e-mail со страницей
pub async fn list(query: &ListQuery) -> anyhow::Result<ListResponse<Customer>> {
    let items = repository::list_all().await?;
    Ok(query.apply(items, |c| {
        vec![
            c.base.code.clone(),
            c.base.description.clone(),
            c.phone.clone(),
            c.national_id.clone(),
            c.driver_license.clone(),
            c.email.clone().unwrap_or_default(),
        ]
    }))
}

/// Группы клиентов с совпадающим телефоном, удостоверением или e-mail
pub async fn duplicates() -> anyhow::Result<Vec<DuplicateGroup>> {
    let items = repository::list_all().await?;
    Ok(find_duplicates(&items))
}

pub async fn set_blacklist(id: Uuid, request: BlacklistRequest, actor: &Actor) -> anyhow::Result<()> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Клиент", &id.to_string()))?;

    aggregate
        .set_blacklist(request.is_blacklisted, request.reason)
        .map_err(ServiceError::validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    let details = if aggregate.is_blacklisted {
        format!(
            "В чёрный список: {}",
            aggregate.blacklist_reason.as_deref().unwrap_or_default()
        )
    } else {
        "Исключён из чёрного списка".to_string()
    };
    record_change(actor, collection(), &id.to_string(), AuditAction::StatusChange, Some(details)).await;
    Ok(())
}
