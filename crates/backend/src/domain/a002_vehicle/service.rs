use super::repository;
use chrono::NaiveDate;
use contracts::domain::a002_vehicle::{Vehicle, VehicleDto, VehicleStatus};
use contracts::domain::a003_rental_contract::ContractStatus;
use contracts::domain::common::AggregateRoot;
use contracts::shared::duplicates::{conflict_message, find_conflict};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use uuid::Uuid;

use crate::domain::a003_rental_contract;
use crate::domain::common::record_change;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    Vehicle::collection_name()
}

async fn ensure_unique(aggregate: &Vehicle) -> anyhow::Result<()> {
    let existing = repository::list_all().await?;
    if let Some((kind, owner)) = find_conflict(&existing, aggregate) {
        return Err(ServiceError::conflict(conflict_message(
            kind,
            &format!("{} {}", owner.plate_number(), owner.base.description),
        )));
    }
    Ok(())
}

/// Ручная смена статуса. "В аренде" ставит только договор,
/// автомобиль с действующим договором нельзя перевести в другой статус.
pub fn check_manual_status(
    current: VehicleStatus,
    target: VehicleStatus,
    has_active_contract: bool,
) -> Result<(), String> {
    if target == current {
        return Ok(());
    }
    if target == VehicleStatus::Rented {
        return Err("Статус «В аренде» устанавливается при оформлении договора".into());
    }
    if has_active_contract {
        return Err("У автомобиля есть действующий договор аренды".into());
    }
    Ok(())
}

/// Создание нового автомобиля
pub async fn create(dto: VehicleDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let mut aggregate = Vehicle::new_for_insert(&dto);
    if aggregate.status == VehicleStatus::Rented {
        return Err(ServiceError::validation(
            "Новый автомобиль не может быть в статусе «В аренде»",
        ));
    }

    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(aggregate.plate_number().to_string()),
    )
    .await;
    Ok(id)
}

/// Обновление карточки автомобиля (статус не меняется)
pub async fn update(dto: VehicleDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Автомобиль", &raw_id))?;

    let previous_mileage = aggregate.mileage;
    aggregate.update(&dto);
    if aggregate.mileage < previous_mileage {
        return Err(ServiceError::validation(format!(
            "Пробег {} меньше текущего ({})",
            aggregate.mileage, previous_mileage
        )));
    }
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    Ok(())
}

pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    let active = a003_rental_contract::repository::active_for_vehicle(get_connection(), id).await?;
    if !active.is_empty() {
        return Err(ServiceError::conflict(
            "Нельзя удалить автомобиль с действующим договором аренды",
        ));
    }
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Vehicle>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Vehicle>> {
    repository::list_all().await
}

pub async fn list(query: &ListQuery) -> anyhow::Result<ListResponse<Vehicle>> {
    let items = repository::list_all().await?;
    Ok(query.apply(items, |v| {
        vec![
            v.base.code.clone(),
            v.base.description.clone(),
            v.vin.clone().unwrap_or_default(),
            v.category.label().to_string(),
            v.status.label().to_string(),
        ]
    }))
}

pub async fn set_status(id: Uuid, status: VehicleStatus, actor: &Actor) -> anyhow::Result<()> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Автомобиль", &id.to_string()))?;

    let active = a003_rental_contract::repository::active_for_vehicle(get_connection(), id).await?;
    check_manual_status(aggregate.status, status, !active.is_empty())
        .map_err(ServiceError::conflict)?;
    if aggregate.status == status {
        return Ok(());
    }

    let previous = aggregate.status;
    aggregate.status = status;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::StatusChange,
        Some(format!("{} → {}", previous.label(), status.label())),
    )
    .await;
    Ok(())
}

/// Свободные автомобили без пересекающихся договоров на период
pub async fn available(from: NaiveDate, to: NaiveDate) -> anyhow::Result<Vec<Vehicle>> {
    if to < from {
        return Err(ServiceError::validation("Дата окончания раньше даты начала"));
    }
    let busy: Vec<Uuid> = a003_rental_contract::repository::list_overlapping(from, to)
        .await?
        .into_iter()
        .filter(|c| c.status == ContractStatus::Active)
        .map(|c| c.vehicle_id.value())
        .collect();
    Ok(repository::list_all()
        .await?
        .into_iter()
        .filter(|v| v.is_rentable() && !busy.contains(&v.base.id.value()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rented_is_never_set_by_hand() {
        assert!(check_manual_status(VehicleStatus::Available, VehicleStatus::Rented, false).is_err());
    }

    #[test]
    fn active_contract_blocks_manual_change() {
        assert!(check_manual_status(VehicleStatus::Rented, VehicleStatus::Available, true).is_err());
        assert!(check_manual_status(VehicleStatus::Rented, VehicleStatus::Maintenance, true).is_err());
    }

    #[test]
    fn free_vehicle_moves_between_statuses() {
        assert!(check_manual_status(VehicleStatus::Available, VehicleStatus::Maintenance, false).is_ok());
        assert!(check_manual_status(VehicleStatus::Maintenance, VehicleStatus::OutOfService, false).is_ok());
        assert!(check_manual_status(VehicleStatus::Rented, VehicleStatus::Rented, true).is_ok());
    }
}
