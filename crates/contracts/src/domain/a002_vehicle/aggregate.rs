use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::common::{today, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::duplicates::{DuplicateCandidate, DuplicateKind};
use crate::shared::validation::{
    normalize_plate, require, validate_non_negative, validate_positive, validate_vin,
};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор автомобиля
    VehicleId
);

/// Самый старый допустимый год выпуска
pub const MIN_VEHICLE_YEAR: i32 = 1980;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VehicleStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
    OutOfService,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Available,
        VehicleStatus::Rented,
        VehicleStatus::Maintenance,
        VehicleStatus::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Rented => "Rented",
            VehicleStatus::Maintenance => "Maintenance",
            VehicleStatus::OutOfService => "OutOfService",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Свободен",
            VehicleStatus::Rented => "В аренде",
            VehicleStatus::Maintenance => "На обслуживании",
            VehicleStatus::OutOfService => "Выведен из эксплуатации",
        }
    }

    /// Участвует в расчёте загрузки парка
    pub fn in_fleet(&self) -> bool {
        !matches!(self, VehicleStatus::OutOfService)
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Неизвестный статус автомобиля: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VehicleCategory {
    #[default]
    Economy,
    Compact,
    Midsize,
    Suv,
    Luxury,
    Van,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Economy,
        VehicleCategory::Compact,
        VehicleCategory::Midsize,
        VehicleCategory::Suv,
        VehicleCategory::Luxury,
        VehicleCategory::Van,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Economy => "Economy",
            VehicleCategory::Compact => "Compact",
            VehicleCategory::Midsize => "Midsize",
            VehicleCategory::Suv => "Suv",
            VehicleCategory::Luxury => "Luxury",
            VehicleCategory::Van => "Van",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Economy => "Эконом",
            VehicleCategory::Compact => "Компакт",
            VehicleCategory::Midsize => "Средний",
            VehicleCategory::Suv => "Внедорожник",
            VehicleCategory::Luxury => "Премиум",
            VehicleCategory::Van => "Минивэн",
        }
    }
}

impl std::str::FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleCategory::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Неизвестный класс автомобиля: {}", s))
    }
}

/// Автомобиль парка. `base.code` хранит госномер, `base.description` – "Марка Модель".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(flatten)]
    pub base: BaseAggregate<VehicleId>,

    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub vin: Option<String>,
    pub category: VehicleCategory,
    pub status: VehicleStatus,
    pub daily_rate: f64,
    pub mileage: i64,
    pub purchase_price: f64,
    pub purchase_date: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub registration_expiry: Option<NaiveDate>,
    pub next_service_mileage: Option<i64>,
}

impl Vehicle {
    pub fn new_for_insert(dto: &VehicleDto) -> Self {
        let mut vehicle = Self {
            base: BaseAggregate::new(VehicleId::new_v4(), String::new(), String::new()),
            make: String::new(),
            model: String::new(),
            year: 0,
            color: None,
            vin: None,
            category: VehicleCategory::default(),
            status: VehicleStatus::Available,
            daily_rate: 0.0,
            mileage: 0,
            purchase_price: 0.0,
            purchase_date: None,
            insurance_expiry: None,
            registration_expiry: None,
            next_service_mileage: None,
        };
        vehicle.update(dto);
        if let Some(status) = dto.status {
            vehicle.status = status;
        }
        vehicle
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn plate_number(&self) -> &str {
        &self.base.code
    }

    /// Обновить данные из DTO. Статус меняется только через отдельные операции.
    pub fn update(&mut self, dto: &VehicleDto) {
        self.base.code = normalize_plate(&dto.plate_number);
        self.make = dto.make.trim().to_string();
        self.model = dto.model.trim().to_string();
        self.base.description = format!("{} {}", self.make, self.model).trim().to_string();
        self.base.comment = dto.comment.clone();
        self.year = dto.year;
        self.color = dto.color.clone().filter(|c| !c.trim().is_empty());
        self.vin = dto
            .vin
            .as_deref()
            .map(|v| v.trim().to_uppercase())
            .filter(|v| !v.is_empty());
        self.category = dto.category;
        self.daily_rate = dto.daily_rate;
        self.mileage = dto.mileage;
        self.purchase_price = dto.purchase_price;
        self.purchase_date = dto.purchase_date;
        self.insurance_expiry = dto.insurance_expiry;
        self.registration_expiry = dto.registration_expiry;
        self.next_service_mileage = dto.next_service_mileage;
    }

    /// Автомобиль можно выдать в аренду
    pub fn is_rentable(&self) -> bool {
        self.status == VehicleStatus::Available && !self.base.metadata.is_deleted
    }

    /// Пробег не может уменьшаться
    pub fn record_mileage(&mut self, mileage: i64) -> Result<(), String> {
        if mileage < self.mileage {
            return Err(format!(
                "Пробег {} меньше текущего ({})",
                mileage, self.mileage
            ));
        }
        self.mileage = mileage;
        Ok(())
    }

    /// Километров до планового ТО (отрицательное – ТО просрочено)
    pub fn km_to_service(&self) -> Option<i64> {
        self.next_service_mileage.map(|next| next - self.mileage)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), String> {
        require(&self.base.code, "Госномер")?;
        require(&self.make, "Марка")?;
        require(&self.model, "Модель")?;
        let max_year = today.year() + 1;
        if self.year < MIN_VEHICLE_YEAR || self.year > max_year {
            return Err(format!(
                "Год выпуска должен быть в диапазоне {}..{}",
                MIN_VEHICLE_YEAR, max_year
            ));
        }
        if let Some(vin) = &self.vin {
            validate_vin(vin)?;
        }
        validate_positive(self.daily_rate, "Стоимость суток")?;
        validate_non_negative(self.mileage as f64, "Пробег")?;
        validate_non_negative(self.purchase_price, "Цена покупки")?;
        if let Some(purchase) = self.purchase_date {
            if purchase > today {
                return Err("Дата покупки не может быть в будущем".into());
            }
        }
        if let Some(next) = self.next_service_mileage {
            if next < 0 {
                return Err("Пробег следующего ТО не может быть отрицательным".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl DuplicateCandidate for Vehicle {
    fn candidate_id(&self) -> String {
        self.to_string_id()
    }

    fn candidate_name(&self) -> String {
        format!("{} ({})", self.base.description, self.base.code)
    }

    fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)> {
        vec![(DuplicateKind::Plate, normalize_plate(&self.base.code))]
    }
}

impl AggregateRoot for Vehicle {
    type Id = VehicleId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "vehicle"
    }

    fn element_name() -> &'static str {
        "Автомобиль"
    }

    fn list_name() -> &'static str {
        "Автопарк"
    }
}

/// DTO для создания/обновления автомобиля
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VehicleDto {
    pub id: Option<String>,
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub vin: Option<String>,
    #[serde(default)]
    pub category: VehicleCategory,
    /// Учитывается только при создании
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    pub daily_rate: f64,
    pub mileage: i64,
    pub purchase_price: f64,
    pub purchase_date: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub registration_expiry: Option<NaiveDate>,
    pub next_service_mileage: Option<i64>,
    pub comment: Option<String>,
}

impl From<&Vehicle> for VehicleDto {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: Some(v.to_string_id()),
            plate_number: v.base.code.clone(),
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            color: v.color.clone(),
            vin: v.vin.clone(),
            category: v.category,
            status: Some(v.status),
            daily_rate: v.daily_rate,
            mileage: v.mileage,
            purchase_price: v.purchase_price,
            purchase_date: v.purchase_date,
            insurance_expiry: v.insurance_expiry,
            registration_expiry: v.registration_expiry,
            next_service_mileage: v.next_service_mileage,
            comment: v.base.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: VehicleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dto() -> VehicleDto {
        VehicleDto {
            plate_number: "а 123 вс-77".into(),
            make: "Kia".into(),
            model: "Rio".into(),
            year: 2021,
            daily_rate: 2500.0,
            mileage: 35_000,
            purchase_price: 1_200_000.0,
            next_service_mileage: Some(40_000),
            ..Default::default()
        }
    }

    #[test]
    fn new_vehicle_is_available_with_normalized_plate() {
        let v = Vehicle::new_for_insert(&dto());
        assert_eq!(v.status, VehicleStatus::Available);
        assert_eq!(v.plate_number(), "А123ВС77");
        assert_eq!(v.base.description, "Kia Rio");
        assert!(v.validate_on(d(2025, 1, 1)).is_ok());
        assert!(v.is_rentable());
    }

    #[test]
    fn update_keeps_status() {
        let mut v = Vehicle::new_for_insert(&dto());
        v.status = VehicleStatus::Rented;
        let mut changed = dto();
        changed.status = Some(VehicleStatus::Available);
        v.update(&changed);
        assert_eq!(v.status, VehicleStatus::Rented);
    }

    #[test]
    fn validation_errors() {
        let mut bad = dto();
        bad.year = 1970;
        assert!(Vehicle::new_for_insert(&bad).validate_on(d(2025, 1, 1)).is_err());

        let mut bad = dto();
        bad.daily_rate = 0.0;
        assert!(Vehicle::new_for_insert(&bad).validate_on(d(2025, 1, 1)).is_err());

        let mut bad = dto();
        bad.vin = Some("SHORT".into());
        assert!(Vehicle::new_for_insert(&bad).validate_on(d(2025, 1, 1)).is_err());
    }

    #[test]
    fn mileage_only_grows() {
        let mut v = Vehicle::new_for_insert(&dto());
        assert!(v.record_mileage(34_000).is_err());
        v.record_mileage(36_000).unwrap();
        assert_eq!(v.km_to_service(), Some(4_000));
    }

    #[test]
    fn status_parses_from_str() {
        assert_eq!("Rented".parse::<VehicleStatus>(), Ok(VehicleStatus::Rented));
        assert!("Stolen".parse::<VehicleStatus>().is_err());
    }
}
