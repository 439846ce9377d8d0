use super::repository;
use contracts::domain::a004_inventory_item::{AdjustStockRequest, InventoryItem, InventoryItemDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::duplicates::{conflict_message, find_conflict};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    InventoryItem::collection_name()
}

/// Артикул уникален без учёта регистра
async fn ensure_unique(aggregate: &InventoryItem) -> anyhow::Result<()> {
    let existing = repository::list_all().await?;
    if let Some((kind, owner)) = find_conflict(&existing, aggregate) {
        return Err(ServiceError::conflict(conflict_message(kind, &owner.base.description)));
    }
    Ok(())
}

pub async fn create(dto: InventoryItemDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let mut aggregate = InventoryItem::new_for_insert(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(format!("{} {}", aggregate.sku(), aggregate.base.description)),
    )
    .await;
    Ok(id)
}

pub async fn update(dto: InventoryItemDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Складская позиция", &raw_id))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<InventoryItem>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<InventoryItem>> {
    repository::list_all().await
}

pub async fn list(query: &ListQuery) -> anyhow::Result<ListResponse<InventoryItem>> {
    let items = repository::list_all().await?;
    Ok(query.apply(items, |i| {
        vec![
            i.base.code.clone(),
            i.base.description.clone(),
            i.category.clone(),
            i.supplier.clone().unwrap_or_default(),
            i.location.clone().unwrap_or_default(),
        ]
    }))
}

/// Приход или списание. Причина попадает в журнал аудита.
pub async fn adjust(id: Uuid, request: AdjustStockRequest, actor: &Actor) -> anyhow::Result<InventoryItem> {
    let reason = request.reason.trim().to_string();
    if reason.is_empty() {
        return Err(ServiceError::validation("Укажите причину изменения остатка"));
    }

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Складская позиция", &id.to_string()))?;

    let before = aggregate.quantity;
    aggregate.adjust(request.delta).map_err(ServiceError::validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::StockAdjust,
        Some(format!("{:+} ({} → {}): {}", request.delta, before, aggregate.quantity, reason)),
    )
    .await;
    Ok(aggregate)
}

/// Позиции с остатком на уровне минимального или ниже
pub async fn low_stock() -> anyhow::Result<Vec<InventoryItem>> {
    let mut items: Vec<InventoryItem> = repository::list_all()
        .await?
        .into_iter()
        .filter(InventoryItem::is_low_stock)
        .collect();
    items.sort_by_key(|i| i.quantity - i.min_quantity);
    Ok(items)
}
