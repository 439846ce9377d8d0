use anyhow::Result;
use contracts::domain::common::today;
use contracts::shared::events::ChangeAction;
use contracts::system::notifications::{CheckNotificationsResponse, Notification};

use super::repository;
use super::rules::{self, Draft, Snapshot};
use crate::domain::{a001_customer, a002_vehicle, a003_rental_contract, a004_inventory_item};
use crate::shared::{config, events};
use crate::shared::error::ServiceError;

const ENTITY: &str = "notification";

async fn load_snapshot() -> Result<Snapshot> {
    Ok(Snapshot {
        vehicles: a002_vehicle::repository::list_all().await?,
        contracts: a003_rental_contract::repository::list_active().await?,
        items: a004_inventory_item::repository::list_all().await?,
        customers: a001_customer::repository::list_all().await?,
    })
}

/// Оставить черновики, для которых нет непрочитанного дубля (в том числе внутри пачки)
async fn filter_new(drafts: Vec<Draft>) -> Result<Vec<Draft>> {
    let mut fresh: Vec<Draft> = Vec::new();
    for draft in drafts {
        let repeated = fresh
            .iter()
            .any(|d| d.kind == draft.kind && d.entity_id == draft.entity_id);
        if repeated || repository::unread_exists(draft.kind, &draft.entity_id).await? {
            continue;
        }
        fresh.push(draft);
    }
    Ok(fresh)
}

/// Проверить правила и создать недостающие уведомления
pub async fn check() -> Result<CheckNotificationsResponse> {
    let snapshot = load_snapshot().await?;
    let drafts = rules::evaluate(&snapshot, today(), &config::get().notifications);

    let fresh = filter_new(drafts).await?;
    let mut created = 0u32;
    for draft in &fresh {
        // параллельная проверка могла успеть вставить тот же черновик
        if repository::insert(draft).await?.is_some() {
            created += 1;
        }
    }
    if created > 0 {
        tracing::info!("Created {} notification(s)", created);
        events::publish(ENTITY, None, ChangeAction::Created);
    }

    Ok(CheckNotificationsResponse {
        created,
        unread_total: repository::count_unread().await? as u32,
    })
}

pub async fn list(unread_only: bool) -> Result<Vec<Notification>> {
    repository::list(unread_only).await
}

pub async fn mark_read(id: &str) -> Result<()> {
    if !repository::mark_read(id).await? {
        return Err(ServiceError::not_found("Уведомление", id));
    }
    events::publish(ENTITY, Some(id.to_string()), ChangeAction::Updated);
    Ok(())
}

pub async fn mark_all_read() -> Result<u64> {
    let updated = repository::mark_all_read().await?;
    if updated > 0 {
        events::publish(ENTITY, None, ChangeAction::Updated);
    }
    Ok(updated)
}

pub async fn delete(id: &str) -> Result<()> {
    if !repository::delete(id).await? {
        return Err(ServiceError::not_found("Уведомление", id));
    }
    events::publish(ENTITY, Some(id.to_string()), ChangeAction::Deleted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use contracts::domain::a002_vehicle::{Vehicle, VehicleDto};
    use contracts::system::notifications::{NotificationKind, Severity};
    use uuid::Uuid;

    use crate::shared::data::test_db;

    fn draft(kind: NotificationKind, entity_id: &str) -> Draft {
        Draft {
            kind,
            severity: Severity::Warning,
            title: "Проверка".into(),
            message: "Проверка".into(),
            entity: "vehicle",
            entity_id: entity_id.to_string(),
        }
    }

    /// Автомобиль с просроченной страховкой: правило сработает ровно один раз
    async fn uninsured_vehicle() -> Vehicle {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(3).collect();
        let mut vehicle = Vehicle::new_for_insert(&VehicleDto {
            plate_number: format!("у{}кх77", suffix),
            make: "Lada".into(),
            model: "Vesta".into(),
            year: 2021,
            daily_rate: 1800.0,
            insurance_expiry: Some(today() - Duration::days(1)),
            ..Default::default()
        });
        vehicle.before_write();
        a002_vehicle::repository::insert(&vehicle).await.unwrap();
        vehicle
    }

    async fn unread_for(kind: NotificationKind, entity_id: &str) -> usize {
        repository::list(true)
            .await
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == kind && n.entity_id == entity_id)
            .count()
    }

    #[tokio::test]
    async fn unread_duplicates_are_skipped() {
        let _db = test_db::acquire().await;
        let seen = Uuid::new_v4().to_string();
        let other = Uuid::new_v4().to_string();
        repository::insert(&draft(NotificationKind::LowStock, &seen)).await.unwrap();

        let fresh = filter_new(vec![
            draft(NotificationKind::LowStock, &seen),
            draft(NotificationKind::LowStock, &other),
            draft(NotificationKind::LowStock, &other),
            draft(NotificationKind::ServiceDue, &seen),
        ])
        .await
        .unwrap();

        let pairs: Vec<(NotificationKind, &str)> =
            fresh.iter().map(|d| (d.kind, d.entity_id.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (NotificationKind::LowStock, other.as_str()),
                (NotificationKind::ServiceDue, seen.as_str()),
            ]
        );
    }

    #[tokio::test]
    async fn second_check_creates_nothing() {
        let _db = test_db::acquire().await;
        let vehicle = uninsured_vehicle().await;

        let first = check().await.unwrap();
        assert!(first.created >= 1);
        assert_eq!(unread_for(NotificationKind::InsuranceExpiring, &vehicle.to_string_id()).await, 1);

        let second = check().await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.unread_total, first.unread_total);
    }

    #[tokio::test]
    async fn concurrent_checks_store_one_notification() {
        let _db = test_db::acquire().await;
        let vehicle = uninsured_vehicle().await;

        let (a, b) = tokio::join!(check(), check());
        a.unwrap();
        b.unwrap();
        assert_eq!(unread_for(NotificationKind::InsuranceExpiring, &vehicle.to_string_id()).await, 1);
    }

    #[tokio::test]
    async fn storage_keeps_one_unread_per_object() {
        let _db = test_db::acquire().await;
        let entity = Uuid::new_v4().to_string();
        let low_stock = draft(NotificationKind::LowStock, &entity);

        let id = repository::insert(&low_stock).await.unwrap().expect("first insert");
        assert!(repository::insert(&low_stock).await.unwrap().is_none());

        // после прочтения объект снова может получить уведомление
        assert!(repository::mark_read(&id).await.unwrap());
        assert!(repository::insert(&low_stock).await.unwrap().is_some());
        assert_eq!(unread_for(NotificationKind::LowStock, &entity).await, 1);
    }
}
