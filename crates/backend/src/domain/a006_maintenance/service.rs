use super::repository;
use contracts::domain::a006_maintenance::{MaintenanceDto, MaintenanceRecord, MAINTENANCE_LEDGER_CATEGORY};
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerKind};
use contracts::domain::common::AggregateRoot;
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::domain::{a002_vehicle, a007_ledger_entry};
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    MaintenanceRecord::collection_name()
}

/// Расходная проводка по записи обслуживания
pub fn expense_entry(record: &MaintenanceRecord, plate_number: &str) -> LedgerEntry {
    LedgerEntry::system(
        LedgerKind::Expense,
        MAINTENANCE_LEDGER_CATEGORY,
        record.service_date,
        record.cost,
        format!("{}: {}", plate_number, record.base.description),
        record.to_string_id(),
    )
}

/// Запись обслуживания и расходная проводка в одной транзакции.
/// Бесплатные работы (стоимость 0) проводку не создают.
pub async fn create(dto: MaintenanceDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let vehicle_id = Uuid::parse_str(dto.vehicle_id.trim())
        .map_err(|_| ServiceError::validation("Укажите автомобиль"))?;

    let txn = get_connection().begin().await?;
    let vehicle = a002_vehicle::repository::get_by_id_with(&txn, vehicle_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Автомобиль", &vehicle_id.to_string()))?;

    let mut record = MaintenanceRecord::new_for_insert(vehicle.base.id, &dto);
    record.validate().map_err(ServiceError::validation)?;
    record.before_write();
    let id = repository::insert_with(&txn, &record).await?;

    if record.cost > 0.0 {
        let mut entry = expense_entry(&record, vehicle.plate_number());
        entry.before_write();
        a007_ledger_entry::repository::insert_with(&txn, &entry).await?;
    }
    txn.commit().await?;

    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(format!("{} {:.2}", vehicle.plate_number(), record.cost)),
    )
    .await;
    Ok(id)
}

/// Изменение записи; проводка пересоздаётся по новой стоимости и дате
pub async fn update(dto: MaintenanceDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let txn = get_connection().begin().await?;
    let mut record = repository::get_by_id_with(&txn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Запись обслуживания", &raw_id))?;

    record.update(&dto);
    record.validate().map_err(ServiceError::validation)?;
    record.before_write();
    record.base.metadata.increment_version();
    repository::update_with(&txn, &record).await?;

    let plate = a002_vehicle::repository::get_by_id_with(&txn, record.vehicle_id.value())
        .await?
        .map(|v| v.plate_number().to_string())
        .unwrap_or_default();
    a007_ledger_entry::repository::soft_delete_by_reference(&txn, &raw_id).await?;
    if record.cost > 0.0 {
        let mut entry = expense_entry(&record, &plate);
        entry.before_write();
        a007_ledger_entry::repository::insert_with(&txn, &entry).await?;
    }
    txn.commit().await?;

    record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    Ok(())
}

/// Удаление вместе с проводкой
pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    let txn = get_connection().begin().await?;
    let deleted = repository::soft_delete_with(&txn, id).await?;
    if deleted {
        a007_ledger_entry::repository::soft_delete_by_reference(&txn, &id.to_string()).await?;
    }
    txn.commit().await?;

    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<MaintenanceRecord>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<MaintenanceRecord>> {
    repository::list(None).await
}

pub async fn list(vehicle_id: Option<Uuid>, query: &ListQuery) -> anyhow::Result<ListResponse<MaintenanceRecord>> {
    let items = repository::list(vehicle_id).await?;
    Ok(query.apply(items, |m| {
        vec![
            m.base.code.clone(),
            m.base.description.clone(),
            m.kind.label().to_string(),
            m.vendor.clone().unwrap_or_default(),
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a002_vehicle::VehicleId;
    use contracts::domain::a006_maintenance::MaintenanceKind;

    #[test]
    fn expense_entry_references_record() {
        let record = MaintenanceRecord::new_for_insert(
            VehicleId::new_v4(),
            &MaintenanceDto {
                service_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
                kind: MaintenanceKind::Tires,
                cost: 12000.0,
                mileage: 42000,
                ..Default::default()
            },
        );
        let entry = expense_entry(&record, "А123ВС77");
        assert_eq!(entry.kind, LedgerKind::Expense);
        assert_eq!(entry.category, MAINTENANCE_LEDGER_CATEGORY);
        assert_eq!(entry.amount, 12000.0);
        assert!(entry.tax_deductible);
        assert_eq!(entry.entry_date, record.service_date);
        assert_eq!(entry.reference, Some(record.to_string_id()));
        assert!(entry.base.description.starts_with("А123ВС77: "));
    }
}
