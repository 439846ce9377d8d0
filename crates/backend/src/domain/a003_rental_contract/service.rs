use super::repository;
use chrono::{NaiveDate, Utc};
use contracts::domain::a001_customer::{Customer, CustomerId};
use contracts::domain::a002_vehicle::{Vehicle, VehicleId, VehicleStatus};
use contracts::domain::a003_rental_contract::{
    CompleteContractRequest, ContractListItem, ContractStatus, RentalContract, RentalContractDto,
};
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerKind, CATEGORY_RENTAL};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use contracts::system::email::{SendEmailRequest, SendEmailResponse};
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::domain::{a001_customer, a002_vehicle, a007_ledger_entry};
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;
use crate::shared::format::format_money;
use crate::system::auth::extractor::Actor;
use crate::system::email::service as email;

fn collection() -> &'static str {
    RentalContract::collection_name()
}

fn parse_id(raw: &str, what: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::validation(format!("{}: некорректный идентификатор «{}»", what, raw)))
}

/// Условия выдачи: клиент не в чёрном списке и с действующими правами, автомобиль свободен
pub fn check_issue(customer: &Customer, vehicle: &Vehicle, end_date: NaiveDate) -> Result<(), String> {
    if customer.is_blacklisted {
        return Err(format!(
            "Клиент {} в чёрном списке: {}",
            customer.full_name(),
            customer.blacklist_reason.clone().unwrap_or_default()
        ));
    }
    if !customer.license_valid_on(end_date) {
        return Err(format!(
            "Водительское удостоверение клиента {} истекает до окончания аренды",
            customer.full_name()
        ));
    }
    if !vehicle.is_rentable() {
        return Err(format!(
            "Автомобиль {} недоступен (статус: {})",
            vehicle.plate_number(),
            vehicle.status.label()
        ));
    }
    Ok(())
}

async fn load_vehicle<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Vehicle> {
    a002_vehicle::repository::get_by_id_with(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Автомобиль", &id.to_string()))
}

async fn load_contract<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<RentalContract> {
    repository::get_by_id_with(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Договор аренды", &id.to_string()))
}

/// Оформление договора: вставка договора и перевод автомобиля в аренду одной транзакцией
pub async fn create(dto: RentalContractDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let customer_id = parse_id(&dto.customer_id, "Клиент")?;
    let vehicle_id = parse_id(&dto.vehicle_id, "Автомобиль")?;

    let txn = get_connection().begin().await?;

    let customer = a001_customer::repository::get_by_id_with(&txn, customer_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Клиент", &customer_id.to_string()))?;
    let mut vehicle = load_vehicle(&txn, vehicle_id).await?;
    check_issue(&customer, &vehicle, dto.end_date).map_err(ServiceError::conflict)?;

    let mut dto = dto;
    if dto.daily_rate <= 0.0 {
        dto.daily_rate = vehicle.daily_rate;
    }
    let mut contract = RentalContract::new_for_insert(
        CustomerId(customer_id),
        VehicleId(vehicle_id),
        &dto,
        vehicle.mileage,
    );
    contract.validate().map_err(ServiceError::validation)?;
    contract.before_write();
    let id = repository::insert_with(&txn, &contract).await?;

    vehicle.status = VehicleStatus::Rented;
    vehicle.before_write();
    vehicle.base.metadata.increment_version();
    a002_vehicle::repository::update_with(&txn, &vehicle).await?;

    let prepayment = match upfront_payment(&contract) {
        Some(mut entry) => {
            entry.before_write();
            let entry_id = a007_ledger_entry::repository::insert_with(&txn, &entry).await?;
            Some((entry_id, entry))
        }
        None => None,
    };

    txn.commit().await?;

    tracing::info!(
        "Contract {} issued: {} → {}",
        contract.base.code,
        vehicle.plate_number(),
        customer.full_name()
    );
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(format!("{} / {}", vehicle.plate_number(), customer.full_name())),
    )
    .await;
    record_change(
        actor,
        Vehicle::collection_name(),
        &vehicle_id.to_string(),
        AuditAction::StatusChange,
        Some(format!("{} → {}", VehicleStatus::Available.label(), VehicleStatus::Rented.label())),
    )
    .await;
    if let Some((entry_id, entry)) = prepayment {
        record_change(
            actor,
            LedgerEntry::collection_name(),
            &entry_id.to_string(),
            AuditAction::Create,
            Some(entry.base.description.clone()),
        )
        .await;
    }
    Ok(id)
}

/// Изменение условий действующего договора
pub async fn update(dto: RentalContractDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = parse_id(&raw_id, "Договор")?;
    let mut contract = load_contract(get_connection(), id).await?;

    contract.update(&dto).map_err(ServiceError::conflict)?;
    contract.validate().map_err(ServiceError::validation)?;
    contract.before_write();
    contract.base.metadata.increment_version();
    repository::update(&contract).await?;

    record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    Ok(())
}

/// Возврат автомобиля: закрытие договора, пеня за просрочку, пробег и статус автомобиля
pub async fn complete(id: Uuid, request: CompleteContractRequest, actor: &Actor) -> anyhow::Result<RentalContract> {
    let returned_at = request.returned_at.unwrap_or_else(|| Utc::now().date_naive());

    let txn = get_connection().begin().await?;
    let mut contract = load_contract(&txn, id).await?;
    let mut vehicle = load_vehicle(&txn, contract.vehicle_id.value()).await?;

    contract
        .complete(request.end_mileage, returned_at, request.extra_payment)
        .map_err(ServiceError::validation)?;
    contract.validate().map_err(ServiceError::validation)?;
    contract.before_write();
    contract.base.metadata.increment_version();
    repository::update_with(&txn, &contract).await?;

    vehicle.record_mileage(request.end_mileage).map_err(ServiceError::validation)?;
    vehicle.status = VehicleStatus::Available;
    vehicle.before_write();
    vehicle.base.metadata.increment_version();
    a002_vehicle::repository::update_with(&txn, &vehicle).await?;

    if request.extra_payment > 0.0 {
        let mut entry = payment_entry(&contract, request.extra_payment, returned_at);
        entry.before_write();
        a007_ledger_entry::repository::insert_with(&txn, &entry).await?;
    }

    txn.commit().await?;

    let details = if contract.late_fee > 0.0 {
        format!("Пеня за просрочку {:.2}", contract.late_fee)
    } else {
        format!("Пробег {}", request.end_mileage)
    };
    record_change(actor, collection(), &id.to_string(), AuditAction::StatusChange, Some(details)).await;
    record_change(
        actor,
        Vehicle::collection_name(),
        &vehicle.to_string_id(),
        AuditAction::StatusChange,
        Some(format!("{} → {}", VehicleStatus::Rented.label(), VehicleStatus::Available.label())),
    )
    .await;
    Ok(contract)
}

/// Отмена действующего договора, автомобиль снова свободен
pub async fn cancel(id: Uuid, actor: &Actor) -> anyhow::Result<()> {
    let txn = get_connection().begin().await?;
    let mut contract = load_contract(&txn, id).await?;
    contract.cancel().map_err(ServiceError::conflict)?;
    contract.before_write();
    contract.base.metadata.increment_version();
    repository::update_with(&txn, &contract).await?;

    let mut vehicle = load_vehicle(&txn, contract.vehicle_id.value()).await?;
    if vehicle.status == VehicleStatus::Rented {
        vehicle.status = VehicleStatus::Available;
        vehicle.before_write();
        vehicle.base.metadata.increment_version();
        a002_vehicle::repository::update_with(&txn, &vehicle).await?;
    }
    txn.commit().await?;

    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::StatusChange,
        Some(ContractStatus::Cancelled.label().to_string()),
    )
    .await;
    Ok(())
}

fn payment_entry(contract: &RentalContract, amount: f64, date: NaiveDate) -> LedgerEntry {
    LedgerEntry::system(
        LedgerKind::Income,
        CATEGORY_RENTAL,
        date,
        amount,
        format!("Оплата по договору {}", contract.base.code),
        contract.to_string_id(),
    )
}

/// Предоплата при оформлении проводится доходом датой начала аренды
fn upfront_payment(contract: &RentalContract) -> Option<LedgerEntry> {
    (contract.paid_amount > 0.0).then(|| payment_entry(contract, contract.paid_amount, contract.start_date))
}

/// Приём оплаты с проводкой дохода
pub async fn record_payment(id: Uuid, amount: f64, actor: &Actor) -> anyhow::Result<RentalContract> {
    let txn = get_connection().begin().await?;
    let mut contract = load_contract(&txn, id).await?;
    contract.record_payment(amount).map_err(ServiceError::validation)?;
    contract.validate().map_err(ServiceError::validation)?;
    contract.before_write();
    contract.base.metadata.increment_version();
    repository::update_with(&txn, &contract).await?;

    let mut entry = payment_entry(&contract, amount, Utc::now().date_naive());
    entry.before_write();
    let entry_id = a007_ledger_entry::repository::insert_with(&txn, &entry).await?;
    txn.commit().await?;

    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Payment,
        Some(format_money(amount)),
    )
    .await;
    record_change(
        actor,
        LedgerEntry::collection_name(),
        &entry_id.to_string(),
        AuditAction::Create,
        Some(entry.base.description.clone()),
    )
    .await;
    Ok(contract)
}

pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    if let Some(contract) = repository::get_by_id(id).await? {
        if contract.status == ContractStatus::Active {
            return Err(ServiceError::conflict(
                "Действующий договор нельзя удалить, сначала завершите или отмените его",
            ));
        }
    }
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<RentalContract>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<RentalContract>> {
    repository::list_all(None).await
}

pub fn list_item(
    contract: &RentalContract,
    customer: Option<&Customer>,
    vehicle: Option<&Vehicle>,
    today: NaiveDate,
) -> ContractListItem {
    ContractListItem {
        id: contract.to_string_id(),
        code: contract.base.code.clone(),
        customer_id: contract.customer_id.as_string(),
        customer_name: customer.map(|c| c.full_name().to_string()).unwrap_or_default(),
        vehicle_id: contract.vehicle_id.as_string(),
        plate_number: vehicle.map(|v| v.plate_number().to_string()).unwrap_or_default(),
        vehicle_name: vehicle.map(|v| v.base.description.clone()).unwrap_or_default(),
        start_date: contract.start_date,
        end_date: contract.end_date,
        rental_days: contract.rental_days(),
        total_amount: contract.total_amount,
        paid_amount: contract.paid_amount,
        balance_due: contract.balance_due(),
        status: contract.status,
        is_overdue: contract.is_overdue(today),
    }
}

/// Договоры с именем клиента и госномером
pub async fn list_items(status: Option<ContractStatus>) -> anyhow::Result<Vec<ContractListItem>> {
    let contracts = repository::list_all(status).await?;

    let customer_ids: Vec<String> = contracts.iter().map(|c| c.customer_id.as_string()).collect();
    let vehicle_ids: Vec<String> = contracts.iter().map(|c| c.vehicle_id.as_string()).collect();
    let customers: HashMap<String, Customer> = a001_customer::repository::get_many(customer_ids)
        .await?
        .into_iter()
        .map(|c| (c.to_string_id(), c))
        .collect();
    let vehicles: HashMap<String, Vehicle> = a002_vehicle::repository::get_many(vehicle_ids)
        .await?
        .into_iter()
        .map(|v| (v.to_string_id(), v))
        .collect();

    let today = Utc::now().date_naive();
    Ok(contracts
        .iter()
        .map(|c| {
            list_item(
                c,
                customers.get(&c.customer_id.as_string()),
                vehicles.get(&c.vehicle_id.as_string()),
                today,
            )
        })
        .collect())
}

pub async fn list(status: Option<ContractStatus>, query: &ListQuery) -> anyhow::Result<ListResponse<ContractListItem>> {
    let items = list_items(status).await?;
    Ok(query.apply(items, |row: &ContractListItem| {
        vec![
            row.code.clone(),
            row.customer_name.clone(),
            row.plate_number.clone(),
            row.vehicle_name.clone(),
        ]
    }))
}

pub fn summary_text(contract: &RentalContract, customer: &Customer, vehicle: &Vehicle) -> String {
    let mut lines = vec![
        format!("Здравствуйте, {}!", customer.full_name()),
        String::new(),
        format!("Договор аренды {}", contract.base.code),
        format!("Автомобиль: {} ({})", vehicle.base.description, vehicle.plate_number()),
        format!(
            "Период: {} – {} ({} сут.)",
            contract.start_date.format("%d.%m.%Y"),
            contract.end_date.format("%d.%m.%Y"),
            contract.rental_days()
        ),
        format!("Ставка: {} в сутки", format_money(contract.daily_rate)),
        format!("Сумма договора: {}", format_money(contract.total_amount)),
        format!("Залог: {}", format_money(contract.deposit)),
        format!("Оплачено: {}", format_money(contract.paid_amount)),
    ];
    if contract.late_fee > 0.0 {
        lines.push(format!("Пеня за просрочку: {}", format_money(contract.late_fee)));
    }
    lines.push(format!("К оплате: {}", format_money(contract.balance_due().max(0.0))));
    lines.push(format!("Статус: {}", contract.status.label()));
    lines.join("\n")
}

/// Отправить клиенту сводку по договору
pub async fn send_summary(id: Uuid, actor: &Actor) -> anyhow::Result<SendEmailResponse> {
    let contract = load_contract(get_connection(), id).await?;
    let customer = a001_customer::repository::get_by_id(contract.customer_id.value())
        .await?
        .ok_or_else(|| ServiceError::not_found("Клиент", &contract.customer_id.as_string()))?;
    let vehicle = load_vehicle(get_connection(), contract.vehicle_id.value()).await?;

    let to = customer
        .email
        .clone()
        .ok_or_else(|| ServiceError::validation("У клиента не указан e-mail"))?;

    let request = SendEmailRequest {
        to,
        subject: format!("Договор аренды {}", contract.base.code),
        body: summary_text(&contract, &customer, &vehicle),
    };
    email::send(request, actor, collection(), Some(&id.to_string())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerDto;
    use contracts::domain::a002_vehicle::VehicleDto;
    use sea_orm::{DatabaseBackend, Statement};

    use crate::shared::data::test_db;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn customer() -> Customer {
        Customer::new_for_insert(&CustomerDto {
            description: "Иванов Иван".into(),
            phone: "+7 900 000-00-01".into(),
            national_id: "4510 123456".into(),
            driver_license: "77AA123456".into(),
            license_expiry: Some(d(2030, 1, 1)),
            ..Default::default()
        })
    }

    fn vehicle() -> Vehicle {
        Vehicle::new_for_insert(&VehicleDto {
            plate_number: "а123вс77".into(),
            make: "Kia".into(),
            model: "Rio".into(),
            year: 2022,
            daily_rate: 2500.0,
            mileage: 15000,
            ..Default::default()
        })
    }

    fn contract(v: &Vehicle) -> RentalContract {
        RentalContract::new_for_insert(
            CustomerId::new_v4(),
            v.base.id,
            &RentalContractDto {
                start_date: d(2025, 3, 1),
                end_date: d(2025, 3, 4),
                daily_rate: v.daily_rate,
                paid_amount: 2500.0,
                ..Default::default()
            },
            v.mileage,
        )
    }

    #[test]
    fn issue_allowed_for_clean_customer() {
        assert!(check_issue(&customer(), &vehicle(), d(2025, 3, 4)).is_ok());
    }

    #[test]
    fn blacklisted_customer_rejected() {
        let mut c = customer();
        c.set_blacklist(true, Some("Порча имущества".into())).unwrap();
        let err = check_issue(&c, &vehicle(), d(2025, 3, 4)).unwrap_err();
        assert!(err.contains("чёрном списке"));
    }

    #[test]
    fn expired_licence_rejected() {
        assert!(check_issue(&customer(), &vehicle(), d(2031, 1, 1)).is_err());
    }

    #[test]
    fn busy_vehicle_rejected() {
        let mut v = vehicle();
        v.status = VehicleStatus::Maintenance;
        assert!(check_issue(&customer(), &v, d(2025, 3, 4)).is_err());
    }

    #[test]
    fn list_item_carries_names_and_balance() {
        let v = vehicle();
        let c = customer();
        let contract = contract(&v);
        let row = list_item(&contract, Some(&c), Some(&v), d(2025, 3, 10));
        assert_eq!(row.customer_name, "Иванов Иван");
        assert_eq!(row.plate_number, v.plate_number());
        assert_eq!(row.rental_days, 3);
        assert_eq!(row.balance_due, 5000.0);
        assert!(row.is_overdue);
    }

    #[test]
    fn missing_references_leave_blank_names() {
        let v = vehicle();
        let row = list_item(&contract(&v), None, None, d(2025, 3, 2));
        assert!(row.customer_name.is_empty());
        assert!(!row.is_overdue);
    }

    #[test]
    fn summary_mentions_amounts() {
        let v = vehicle();
        let text = summary_text(&contract(&v), &customer(), &v);
        assert!(text.contains("Сумма договора: 7 500,00"));
        assert!(text.contains("К оплате: 5 000,00"));
        assert!(!text.contains("Пеня"));
    }

    #[test]
    fn payment_entry_is_rental_income() {
        let v = vehicle();
        let c = contract(&v);
        let entry = payment_entry(&c, 1000.0, d(2025, 3, 2));
        assert_eq!(entry.kind, LedgerKind::Income);
        assert_eq!(entry.category, CATEGORY_RENTAL);
        assert_eq!(entry.reference.as_deref(), Some(c.to_string_id().as_str()));
    }

    #[test]
    fn prepayment_posts_income_on_start_date() {
        let v = vehicle();
        let c = contract(&v);
        let entry = upfront_payment(&c).expect("prepaid contract");
        assert_eq!(entry.kind, LedgerKind::Income);
        assert_eq!(entry.amount, 2500.0);
        assert_eq!(entry.entry_date, d(2025, 3, 1));
    }

    async fn seed_parties() -> (Customer, Vehicle) {
        let mut c = customer();
        c.before_write();
        a001_customer::repository::insert(&c).await.unwrap();
        let mut v = vehicle();
        v.before_write();
        a002_vehicle::repository::insert(&v).await.unwrap();
        (c, v)
    }

    fn issue(c: &Customer, v: &Vehicle, paid: f64) -> RentalContractDto {
        let start = Utc::now().date_naive();
        RentalContractDto {
            customer_id: c.to_string_id(),
            vehicle_id: v.to_string_id(),
            start_date: start,
            end_date: start + chrono::Duration::days(3),
            paid_amount: paid,
            ..Default::default()
        }
    }

    async fn ledger_for(contract_id: Uuid) -> Vec<LedgerEntry> {
        a007_ledger_entry::repository::find_by_reference(get_connection(), &contract_id.to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn issue_posts_prepayment_and_rents_vehicle() {
        let _db = test_db::acquire().await;
        let (c, v) = seed_parties().await;

        let id = create(issue(&c, &v, 3000.0), &Actor::system()).await.unwrap();

        let entries = ledger_for(id).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, LedgerKind::Income);
        assert_eq!(entries[0].amount, 3000.0);
        let vehicle = a002_vehicle::repository::get_by_id(v.base.id.value()).await.unwrap().unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Rented);
    }

    #[tokio::test]
    async fn editing_terms_does_not_touch_payments() {
        let _db = test_db::acquire().await;
        let (c, v) = seed_parties().await;
        let id = create(issue(&c, &v, 3000.0), &Actor::system()).await.unwrap();

        let mut dto = issue(&c, &v, 7500.0);
        dto.id = Some(id.to_string());
        dto.daily_rate = 2500.0;
        update(dto, &Actor::system()).await.unwrap();

        let stored = get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.paid_amount, 3000.0);
        assert_eq!(ledger_for(id).await.len(), 1);

        record_payment(id, 4500.0, &Actor::system()).await.unwrap();
        let entries = ledger_for(id).await;
        assert_eq!(entries.iter().map(|e| e.amount).sum::<f64>(), 7500.0);
    }

    #[tokio::test]
    async fn failed_vehicle_update_rolls_back_issue() {
        let _db = test_db::acquire().await;
        let (c, v) = seed_parties().await;
        let trigger = format!("lock_vehicle_{}", v.base.id.value().simple());
        get_connection()
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(
                    "CREATE TRIGGER {} BEFORE UPDATE ON a002_vehicle WHEN OLD.id = '{}' \
                     BEGIN SELECT RAISE(ABORT, 'vehicle locked'); END",
                    trigger,
                    v.to_string_id()
                ),
            ))
            .await
            .unwrap();

        assert!(create(issue(&c, &v, 3000.0), &Actor::system()).await.is_err());

        let contracts = repository::list_all(None).await.unwrap();
        assert!(contracts.iter().all(|contract| contract.vehicle_id != v.base.id));
        let vehicle = a002_vehicle::repository::get_by_id(v.base.id.value()).await.unwrap().unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Available);

        get_connection()
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("DROP TRIGGER {}", trigger),
            ))
            .await
            .unwrap();
    }

    #[test]
    fn unpaid_contract_posts_nothing() {
        let v = vehicle();
        let mut c = contract(&v);
        c.paid_amount = 0.0;
        assert!(upfront_payment(&c).is_none());
    }
}
