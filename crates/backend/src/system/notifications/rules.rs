//! Правила уведомлений. Чистая функция над снимком данных, без обращения к БД.

use chrono::{Duration, NaiveDate};
use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a003_rental_contract::{ContractStatus, RentalContract};
use contracts::domain::a004_inventory_item::InventoryItem;
use contracts::system::notifications::{NotificationKind, Severity};

use crate::shared::config::NotificationsConfig;

/// Данные, по которым проверяются правила
#[derive(Debug, Default)]
pub struct Snapshot {
    pub vehicles: Vec<Vehicle>,
    pub contracts: Vec<RentalContract>,
    pub items: Vec<InventoryItem>,
    pub customers: Vec<Customer>,
}

/// Уведомление, которое должно существовать
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub entity: &'static str,
    pub entity_id: String,
}

fn expiry_draft(
    kind: NotificationKind,
    what: &str,
    vehicle: &Vehicle,
    expiry: Option<NaiveDate>,
    today: NaiveDate,
    warning_days: i64,
) -> Option<Draft> {
    let expiry = expiry?;
    if expiry > today + Duration::days(warning_days) {
        return None;
    }
    let (severity, message) = if expiry < today {
        (
            Severity::Critical,
            format!("{} истекла {}", what, expiry.format("%d.%m.%Y")),
        )
    } else {
        let days = (expiry - today).num_days();
        (
            Severity::Warning,
            format!("{} истекает {} (через {} дн.)", what, expiry.format("%d.%m.%Y"), days),
        )
    };
    Some(Draft {
        kind,
        severity,
        title: format!("{}: {}", vehicle.plate_number(), what),
        message,
        entity: "vehicle",
        entity_id: vehicle.to_string_id(),
    })
}

fn vehicle_drafts(vehicle: &Vehicle, today: NaiveDate, cfg: &NotificationsConfig) -> Vec<Draft> {
    let mut drafts = Vec::new();
    if !vehicle.status.in_fleet() {
        return drafts;
    }
    drafts.extend(expiry_draft(
        NotificationKind::InsuranceExpiring,
        "Страховка",
        vehicle,
        vehicle.insurance_expiry,
        today,
        cfg.insurance_warning_days,
    ));
    drafts.extend(expiry_draft(
        NotificationKind::RegistrationExpiring,
        "Регистрация",
        vehicle,
        vehicle.registration_expiry,
        today,
        cfg.registration_warning_days,
    ));
    if let Some(km_left) = vehicle.km_to_service() {
        if km_left <= cfg.service_warning_km {
            let (severity, message) = if km_left <= 0 {
                (Severity::Critical, format!("ТО просрочено на {} км", -km_left))
            } else {
                (Severity::Warning, format!("До планового ТО {} км", km_left))
            };
            drafts.push(Draft {
                kind: NotificationKind::ServiceDue,
                severity,
                title: format!("{}: техническое обслуживание", vehicle.plate_number()),
                message,
                entity: "vehicle",
                entity_id: vehicle.to_string_id(),
            });
        }
    }
    drafts
}

pub fn evaluate(snapshot: &Snapshot, today: NaiveDate, cfg: &NotificationsConfig) -> Vec<Draft> {
    let mut drafts: Vec<Draft> = snapshot
        .vehicles
        .iter()
        .filter(|v| !v.base.metadata.is_deleted)
        .flat_map(|v| vehicle_drafts(v, today, cfg))
        .collect();

    for contract in snapshot.contracts.iter().filter(|c| c.is_overdue(today)) {
        let days = (today - contract.end_date).num_days();
        drafts.push(Draft {
            kind: NotificationKind::ContractOverdue,
            severity: Severity::Critical,
            title: format!("Договор {} просрочен", contract.base.code),
            message: format!(
                "Автомобиль не возвращён, срок истёк {} ({} дн.)",
                contract.end_date.format("%d.%m.%Y"),
                days
            ),
            entity: "rental_contract",
            entity_id: contract.to_string_id(),
        });
    }

    for item in snapshot
        .items
        .iter()
        .filter(|i| !i.base.metadata.is_deleted && i.is_low_stock())
    {
        drafts.push(Draft {
            kind: NotificationKind::LowStock,
            severity: if item.quantity == 0 {
                Severity::Critical
            } else {
                Severity::Warning
            },
            title: format!("Мало на складе: {}", item.base.description),
            message: format!(
                "Остаток {} при минимуме {} (арт. {})",
                item.quantity,
                item.min_quantity,
                item.sku()
            ),
            entity: "inventory_item",
            entity_id: item.to_string_id(),
        });
    }

    for customer in &snapshot.customers {
        if customer.license_valid_on(today) {
            continue;
        }
        let holds_active = snapshot
            .contracts
            .iter()
            .any(|c| c.status == ContractStatus::Active && c.customer_id == customer.base.id);
        if holds_active {
            drafts.push(Draft {
                kind: NotificationKind::LicenseExpired,
                severity: Severity::Critical,
                title: format!("Права клиента просрочены: {}", customer.full_name()),
                message: "У клиента действующий договор аренды, а срок водительского удостоверения истёк"
                    .to_string(),
                entity: "customer",
                entity_id: customer.to_string_id(),
            });
        }
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerDto;
    use contracts::domain::a002_vehicle::{VehicleDto, VehicleStatus};
    use contracts::domain::a003_rental_contract::RentalContractDto;
    use contracts::domain::a004_inventory_item::InventoryItemDto;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-06-15")
    }

    fn vehicle() -> Vehicle {
        Vehicle::new_for_insert(&VehicleDto {
            plate_number: "A123BC77".into(),
            make: "Kia".into(),
            model: "Rio".into(),
            year: 2021,
            daily_rate: 2500.0,
            mileage: 40_000,
            ..Default::default()
        })
    }

    fn kinds(drafts: &[Draft]) -> Vec<NotificationKind> {
        drafts.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn insurance_threshold_is_inclusive() {
        let cfg = NotificationsConfig::default();
        let mut v = vehicle();
        v.insurance_expiry = Some(today() + Duration::days(cfg.insurance_warning_days));
        let snapshot = Snapshot {
            vehicles: vec![v.clone()],
            ..Default::default()
        };
        let drafts = evaluate(&snapshot, today(), &cfg);
        assert_eq!(kinds(&drafts), vec![NotificationKind::InsuranceExpiring]);
        assert_eq!(drafts[0].severity, Severity::Warning);

        v.insurance_expiry = Some(today() + Duration::days(cfg.insurance_warning_days + 1));
        let snapshot = Snapshot {
            vehicles: vec![v],
            ..Default::default()
        };
        assert!(evaluate(&snapshot, today(), &cfg).is_empty());
    }

    #[test]
    fn expired_registration_is_critical() {
        let mut v = vehicle();
        v.registration_expiry = Some(today() - Duration::days(1));
        let snapshot = Snapshot {
            vehicles: vec![v],
            ..Default::default()
        };
        let drafts = evaluate(&snapshot, today(), &NotificationsConfig::default());
        assert_eq!(kinds(&drafts), vec![NotificationKind::RegistrationExpiring]);
        assert_eq!(drafts[0].severity, Severity::Critical);
    }

    #[test]
    fn service_due_within_km_window() {
        let cfg = NotificationsConfig::default();
        let mut v = vehicle();
        v.next_service_mileage = Some(v.mileage + cfg.service_warning_km);
        let drafts = evaluate(
            &Snapshot {
                vehicles: vec![v.clone()],
                ..Default::default()
            },
            today(),
            &cfg,
        );
        assert_eq!(kinds(&drafts), vec![NotificationKind::ServiceDue]);

        v.next_service_mileage = Some(v.mileage + cfg.service_warning_km + 1);
        let drafts = evaluate(
            &Snapshot {
                vehicles: vec![v],
                ..Default::default()
            },
            today(),
            &cfg,
        );
        assert!(drafts.is_empty());
    }

    #[test]
    fn out_of_service_vehicles_are_ignored() {
        let mut v = vehicle();
        v.status = VehicleStatus::OutOfService;
        v.insurance_expiry = Some(today() - Duration::days(10));
        let drafts = evaluate(
            &Snapshot {
                vehicles: vec![v],
                ..Default::default()
            },
            today(),
            &NotificationsConfig::default(),
        );
        assert!(drafts.is_empty());
    }

    fn contract(customer: &Customer, end: NaiveDate) -> RentalContract {
        let v = vehicle();
        RentalContract::new_for_insert(
            customer.base.id,
            v.base.id,
            &RentalContractDto {
                start_date: end - Duration::days(3),
                end_date: end,
                daily_rate: 2500.0,
                ..Default::default()
            },
            v.mileage,
        )
    }

    fn customer(license_expiry: NaiveDate) -> Customer {
        Customer::new_for_insert(&CustomerDto {
            description: "Иванов Иван".into(),
            phone: "+79001234567".into(),
            national_id: "4510123456".into(),
            driver_license: "7700123456".into(),
            license_expiry: Some(license_expiry),
            ..Default::default()
        })
    }

    #[test]
    fn overdue_contract_and_expired_licence() {
        let c = customer(today() - Duration::days(2));
        let overdue = contract(&c, today() - Duration::days(1));
        let drafts = evaluate(
            &Snapshot {
                contracts: vec![overdue],
                customers: vec![c],
                ..Default::default()
            },
            today(),
            &NotificationsConfig::default(),
        );
        assert_eq!(
            kinds(&drafts),
            vec![NotificationKind::ContractOverdue, NotificationKind::LicenseExpired]
        );
    }

    #[test]
    fn expired_licence_without_active_contract_is_quiet() {
        let c = customer(today() - Duration::days(2));
        let mut finished = contract(&c, today() + Duration::days(2));
        finished.cancel().unwrap();
        let drafts = evaluate(
            &Snapshot {
                contracts: vec![finished],
                customers: vec![c],
                ..Default::default()
            },
            today(),
            &NotificationsConfig::default(),
        );
        assert!(drafts.is_empty());
    }

    #[test]
    fn low_stock_at_minimum() {
        let item = InventoryItem::new_for_insert(&InventoryItemDto {
            sku: "oil-5w30".into(),
            name: "Масло 5W-30".into(),
            category: "Масла".into(),
            quantity: 0,
            min_quantity: 0,
            unit_cost: 900.0,
            ..Default::default()
        });
        let drafts = evaluate(
            &Snapshot {
                items: vec![item],
                ..Default::default()
            },
            today(),
            &NotificationsConfig::default(),
        );
        assert_eq!(kinds(&drafts), vec![NotificationKind::LowStock]);
        assert_eq!(drafts[0].severity, Severity::Critical);
    }
}
