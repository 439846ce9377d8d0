use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a002_vehicle::VehicleId;
use crate::domain::common::{short_code, today, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::validation::validate_non_negative;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор записи об обслуживании
    MaintenanceId
);

/// Категория расхода в журнале для затрат на обслуживание
pub const MAINTENANCE_LEDGER_CATEGORY: &str = "maintenance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaintenanceKind {
    #[default]
    Scheduled,
    Repair,
    Tires,
    Inspection,
    Other,
}

impl MaintenanceKind {
    pub const ALL: [MaintenanceKind; 5] = [
        MaintenanceKind::Scheduled,
        MaintenanceKind::Repair,
        MaintenanceKind::Tires,
        MaintenanceKind::Inspection,
        MaintenanceKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Scheduled => "Scheduled",
            MaintenanceKind::Repair => "Repair",
            MaintenanceKind::Tires => "Tires",
            MaintenanceKind::Inspection => "Inspection",
            MaintenanceKind::Other => "Other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceKind::Scheduled => "Плановое ТО",
            MaintenanceKind::Repair => "Ремонт",
            MaintenanceKind::Tires => "Шиномонтаж",
            MaintenanceKind::Inspection => "Техосмотр",
            MaintenanceKind::Other => "Прочее",
        }
    }
}

impl std::str::FromStr for MaintenanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaintenanceKind::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Неизвестный вид обслуживания: {}", s))
    }
}

/// Запись об обслуживании автомобиля
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    #[serde(flatten)]
    pub base: BaseAggregate<MaintenanceId>,

    pub vehicle_id: VehicleId,
    pub service_date: NaiveDate,
    pub kind: MaintenanceKind,
    pub cost: f64,
    pub mileage: i64,
    pub vendor: Option<String>,
}

impl MaintenanceRecord {
    pub fn new_for_insert(vehicle_id: VehicleId, dto: &MaintenanceDto) -> Self {
        let id = MaintenanceId::new_v4();
        let mut record = Self {
            base: BaseAggregate::new(id, short_code("MT", id.value()), String::new()),
            vehicle_id,
            service_date: dto.service_date,
            kind: dto.kind,
            cost: 0.0,
            mileage: 0,
            vendor: None,
        };
        record.update(dto);
        record
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &MaintenanceDto) {
        self.base.description = if dto.description.trim().is_empty() {
            dto.kind.label().to_string()
        } else {
            dto.description.trim().to_string()
        };
        self.base.comment = dto.comment.clone();
        self.service_date = dto.service_date;
        self.kind = dto.kind;
        self.cost = dto.cost;
        self.mileage = dto.mileage;
        self.vendor = dto.vendor.clone().filter(|v| !v.trim().is_empty());
    }

    pub fn validate(&self) -> Result<(), String> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), String> {
        validate_non_negative(self.cost, "Стоимость")?;
        if self.mileage < 0 {
            return Err("Пробег не может быть отрицательным".into());
        }
        if self.service_date > today {
            return Err("Дата обслуживания не может быть в будущем".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for MaintenanceRecord {
    type Id = MaintenanceId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn collection_name() -> &'static str {
        "maintenance"
    }

    fn element_name() -> &'static str {
        "Обслуживание"
    }

    fn list_name() -> &'static str {
        "Журнал обслуживания"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MaintenanceDto {
    pub id: Option<String>,
    pub vehicle_id: String,
    pub service_date: NaiveDate,
    #[serde(default)]
    pub kind: MaintenanceKind,
    #[serde(default)]
    pub description: String,
    pub cost: f64,
    pub mileage: i64,
    pub vendor: Option<String>,
    pub comment: Option<String>,
}

impl From<&MaintenanceRecord> for MaintenanceDto {
    fn from(m: &MaintenanceRecord) -> Self {
        Self {
            id: Some(m.to_string_id()),
            vehicle_id: m.vehicle_id.as_string(),
            service_date: m.service_date,
            kind: m.kind,
            description: m.base.description.clone(),
            cost: m.cost,
            mileage: m.mileage,
            vendor: m.vendor.clone(),
            comment: m.base.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn description_defaults_to_kind_label() {
        let record = MaintenanceRecord::new_for_insert(
            VehicleId::new_v4(),
            &MaintenanceDto {
                service_date: d(2025, 2, 10),
                kind: MaintenanceKind::Tires,
                cost: 4000.0,
                mileage: 20_000,
                ..Default::default()
            },
        );
        assert_eq!(record.base.description, "Шиномонтаж");
        assert!(record.validate_on(d(2025, 2, 10)).is_ok());
        assert!(record.validate_on(d(2025, 2, 9)).is_err());
    }
}
