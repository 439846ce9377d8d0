//! `GET /api/export/:collection` – выгрузка справочников и журналов в CSV

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a003_rental_contract::ContractListItem;
use contracts::domain::a004_inventory_item::InventoryItem;
use contracts::domain::a005_employee::Employee;
use contracts::domain::a006_maintenance::MaintenanceRecord;
use contracts::domain::a007_ledger_entry::LedgerEntry;
use contracts::system::audit::AuditAction;
use std::collections::HashMap;

use crate::domain::{
    a001_customer, a002_vehicle, a003_rental_contract, a004_inventory_item, a005_employee,
    a006_maintenance, a007_ledger_entry,
};
use crate::shared::error::{ApiResult, ServiceError};
use crate::shared::export::{decimal, flag, optional, to_csv, CsvExportable};
use crate::system::audit::service as audit;
use crate::system::auth::extractor::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportCollection {
    Customers,
    Vehicles,
    Contracts,
    Inventory,
    Employees,
    Maintenance,
    Ledger,
}

impl ExportCollection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "customer" => Some(Self::Customers),
            "vehicle" => Some(Self::Vehicles),
            "rental_contract" => Some(Self::Contracts),
            "inventory_item" => Some(Self::Inventory),
            "employee" => Some(Self::Employees),
            "maintenance" => Some(Self::Maintenance),
            "ledger_entry" => Some(Self::Ledger),
            _ => None,
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Vehicles => "vehicles",
            Self::Contracts => "contracts",
            Self::Inventory => "inventory",
            Self::Employees => "employees",
            Self::Maintenance => "maintenance",
            Self::Ledger => "ledger",
        }
    }
}

impl CsvExportable for Customer {
    fn headers() -> Vec<&'static str> {
        vec!["Код", "ФИО", "Телефон", "Паспорт", "E-mail", "ВУ", "ВУ действует до", "Чёрный список"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.full_name().to_string(),
            self.phone.clone(),
            self.national_id.clone(),
            optional(&self.email),
            self.driver_license.clone(),
            optional(&self.license_expiry),
            flag(self.is_blacklisted),
        ]
    }
}

impl CsvExportable for Vehicle {
    fn headers() -> Vec<&'static str> {
        vec![
            "Госномер", "Автомобиль", "Год", "Класс", "Статус", "Ставка", "Пробег",
            "Страховка до", "Регистрация до",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.plate_number().to_string(),
            self.base.description.clone(),
            self.year.to_string(),
            self.category.label().to_string(),
            self.status.label().to_string(),
            decimal(self.daily_rate),
            self.mileage.to_string(),
            optional(&self.insurance_expiry),
            optional(&self.registration_expiry),
        ]
    }
}

impl CsvExportable for ContractListItem {
    fn headers() -> Vec<&'static str> {
        vec![
            "Номер", "Клиент", "Госномер", "Автомобиль", "Начало", "Окончание", "Сутки",
            "Сумма", "Оплачено", "Остаток", "Статус",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.customer_name.clone(),
            self.plate_number.clone(),
            self.vehicle_name.clone(),
            self.start_date.to_string(),
            self.end_date.to_string(),
            self.rental_days.to_string(),
            decimal(self.total_amount),
            decimal(self.paid_amount),
            decimal(self.balance_due),
            self.status.label().to_string(),
        ]
    }
}

impl CsvExportable for InventoryItem {
    fn headers() -> Vec<&'static str> {
        vec!["Артикул", "Наименование", "Категория", "Остаток", "Минимум", "Цена", "Сумма", "Поставщик"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.sku().to_string(),
            self.base.description.clone(),
            self.category.clone(),
            self.quantity.to_string(),
            self.min_quantity.to_string(),
            decimal(self.unit_cost),
            decimal(self.stock_value()),
            optional(&self.supplier),
        ]
    }
}

impl CsvExportable for Employee {
    fn headers() -> Vec<&'static str> {
        vec!["Таб. номер", "ФИО", "Должность", "Отдел", "Телефон", "Принят", "Оклад", "Статус"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.base.description.clone(),
            self.position.clone(),
            self.department.clone(),
            self.phone.clone(),
            self.hire_date.to_string(),
            decimal(self.salary),
            self.status.label().to_string(),
        ]
    }
}

/// Запись обслуживания с госномером автомобиля
pub struct MaintenanceRow {
    pub record: MaintenanceRecord,
    pub plate_number: String,
}

impl CsvExportable for MaintenanceRow {
    fn headers() -> Vec<&'static str> {
        vec!["Номер", "Дата", "Госномер", "Вид", "Описание", "Пробег", "Стоимость", "Исполнитель"]
    }

    fn row(&self) -> Vec<String> {
        let r = &self.record;
        vec![
            r.base.code.clone(),
            r.service_date.to_string(),
            self.plate_number.clone(),
            r.kind.label().to_string(),
            r.base.description.clone(),
            r.mileage.to_string(),
            decimal(r.cost),
            optional(&r.vendor),
        ]
    }
}

impl CsvExportable for LedgerEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Дата", "Вид", "Категория", "Сумма", "Уменьшает налог", "Описание", "Основание"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.entry_date.to_string(),
            self.kind.label().to_string(),
            self.category.clone(),
            decimal(self.amount),
            flag(self.tax_deductible),
            self.base.description.clone(),
            optional(&self.reference),
        ]
    }
}

async fn maintenance_rows() -> anyhow::Result<Vec<MaintenanceRow>> {
    let plates: HashMap<String, String> = a002_vehicle::service::list_all()
        .await?
        .into_iter()
        .map(|v| (v.to_string_id(), v.plate_number().to_string()))
        .collect();
    Ok(a006_maintenance::service::list_all()
        .await?
        .into_iter()
        .map(|record| {
            let plate_number = plates
                .get(&record.vehicle_id.value().to_string())
                .cloned()
                .unwrap_or_default();
            MaintenanceRow { record, plate_number }
        })
        .collect())
}

/// Возвращает (CSV, число строк)
async fn build(collection: ExportCollection) -> anyhow::Result<(Vec<u8>, usize)> {
    fn pack<T: CsvExportable>(items: Vec<T>) -> anyhow::Result<(Vec<u8>, usize)> {
        Ok((to_csv(&items)?, items.len()))
    }

    match collection {
        ExportCollection::Customers => pack(a001_customer::service::list_all().await?),
        ExportCollection::Vehicles => pack(a002_vehicle::service::list_all().await?),
        ExportCollection::Contracts => pack(a003_rental_contract::service::list_items(None).await?),
        ExportCollection::Inventory => pack(a004_inventory_item::service::list_all().await?),
        ExportCollection::Employees => pack(a005_employee::service::list_all().await?),
        ExportCollection::Maintenance => pack(maintenance_rows().await?),
        ExportCollection::Ledger => pack(a007_ledger_entry::service::list_all().await?),
    }
}

/// GET /api/export/:collection
pub async fn export_csv(actor: Actor, Path(collection): Path<String>) -> ApiResult<Response> {
    let target = ExportCollection::parse(&collection).ok_or_else(|| {
        ServiceError::NotFound(format!("Выгрузка не поддерживается: {}", collection))
    })?;

    let (bytes, rows) = build(target).await?;
    audit::record(
        &actor,
        AuditAction::Export,
        &collection,
        None,
        Some(format!("{} строк", rows)),
    )
    .await;

    let file_name = format!("{}_{}.csv", target.file_stem(), Utc::now().format("%Y%m%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a007_ledger_entry::{LedgerEntryDto, LedgerKind};

    #[test]
    fn parses_known_collections_only() {
        assert_eq!(ExportCollection::parse("vehicle"), Some(ExportCollection::Vehicles));
        assert_eq!(ExportCollection::parse("ledger_entry"), Some(ExportCollection::Ledger));
        assert_eq!(ExportCollection::parse("sys_users"), None);
    }

    #[test]
    fn ledger_row_matches_headers() {
        let entry = LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            kind: LedgerKind::Expense,
            category: "fuel".into(),
            amount: 3200.5,
            tax_deductible: true,
            description: "Топливо".into(),
            ..Default::default()
        });
        let row = entry.row();
        assert_eq!(row.len(), LedgerEntry::headers().len());
        assert_eq!(row[3], "3200,50");
        assert_eq!(row[4], "да");
    }
}
