use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{short_code, today, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::duplicates::{DuplicateCandidate, DuplicateKind};
use crate::shared::validation::{
    age_on, normalize_email, normalize_national_id, normalize_phone, require, validate_email,
    validate_national_id, validate_phone, MIN_RENTER_AGE,
};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор клиента
    CustomerId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Клиент (арендатор). `base.description` хранит ФИО.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub driver_license: String,
    pub license_expiry: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_blacklisted: bool,
    pub blacklist_reason: Option<String>,
}

impl Customer {
    /// Создать нового клиента для вставки в БД
    pub fn new_for_insert(dto: &CustomerDto) -> Self {
        let id = CustomerId::new_v4();
        let code = dto
            .code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| short_code("CL", id.value()));
        let mut customer = Self {
            base: BaseAggregate::new(id, code, dto.description.clone()),
            phone: String::new(),
            national_id: String::new(),
            email: None,
            driver_license: String::new(),
            license_expiry: None,
            birth_date: None,
            address: None,
            is_blacklisted: false,
            blacklist_reason: None,
        };
        customer.update(dto);
        customer
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn full_name(&self) -> &str {
        &self.base.description
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &CustomerDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.phone = dto.phone.trim().to_string();
        self.national_id = dto.national_id.trim().to_string();
        self.email = dto
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());
        self.driver_license = dto.driver_license.trim().to_uppercase();
        self.license_expiry = dto.license_expiry;
        self.birth_date = dto.birth_date;
        self.address = dto.address.clone().filter(|a| !a.trim().is_empty());
        self.is_blacklisted = dto.is_blacklisted;
        self.blacklist_reason = dto.blacklist_reason.clone().filter(|r| !r.trim().is_empty());
    }

    /// Внести в чёрный список или исключить из него
    pub fn set_blacklist(&mut self, is_blacklisted: bool, reason: Option<String>) -> Result<(), String> {
        let reason = reason.filter(|r| !r.trim().is_empty());
        if is_blacklisted && reason.is_none() {
            return Err("Укажите причину внесения в чёрный список".into());
        }
        self.is_blacklisted = is_blacklisted;
        self.blacklist_reason = if is_blacklisted { reason } else { None };
        Ok(())
    }

    /// Водительское удостоверение действует на указанную дату
    pub fn license_valid_on(&self, date: NaiveDate) -> bool {
        self.license_expiry.map(|exp| exp >= date).unwrap_or(true)
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), String> {
        require(&self.base.description, "ФИО")?;
        validate_phone(&self.phone)?;
        validate_national_id(&self.national_id)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        require(&self.driver_license, "Водительское удостоверение")?;
        if let Some(birth) = self.birth_date {
            if birth > today {
                return Err("Дата рождения не может быть в будущем".into());
            }
            if age_on(birth, today) < MIN_RENTER_AGE {
                return Err(format!("Клиенту должно быть не меньше {} лет", MIN_RENTER_AGE));
            }
        }
        if self.is_blacklisted && self.blacklist_reason.is_none() {
            return Err("Укажите причину внесения в чёрный список".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl DuplicateCandidate for Customer {
    fn candidate_id(&self) -> String {
        self.to_string_id()
    }

    fn candidate_name(&self) -> String {
        self.base.description.clone()
    }

    fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)> {
        vec![
            (DuplicateKind::Phone, normalize_phone(&self.phone)),
            (DuplicateKind::NationalId, normalize_national_id(&self.national_id)),
            (
                DuplicateKind::Email,
                self.email.as_deref().map(normalize_email).unwrap_or_default(),
            ),
        ]
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "customer"
    }

    fn element_name() -> &'static str {
        "Клиент"
    }

    fn list_name() -> &'static str {
        "Клиенты"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления клиента
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CustomerDto {
    pub id: Option<String>,
    pub code: Option<String>,
    /// ФИО
    pub description: String,
    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub driver_license: String,
    pub license_expiry: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_blacklisted: bool,
    pub blacklist_reason: Option<String>,
    pub comment: Option<String>,
}

impl From<&Customer> for CustomerDto {
    fn from(c: &Customer) -> Self {
        Self {
            id: Some(c.to_string_id()),
            code: Some(c.base.code.clone()),
            description: c.base.description.clone(),
            phone: c.phone.clone(),
            national_id: c.national_id.clone(),
            email: c.email.clone(),
            driver_license: c.driver_license.clone(),
            license_expiry: c.license_expiry,
            birth_date: c.birth_date,
            address: c.address.clone(),
            is_blacklisted: c.is_blacklisted,
            blacklist_reason: c.blacklist_reason.clone(),
            comment: c.base.comment.clone(),
        }
    }
}

/// Запрос на изменение статуса чёрного списка
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistRequest {
    pub is_blacklisted: bool,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dto() -> CustomerDto {
        CustomerDto {
            description: "Иванов Иван Иванович".into(),
            phone: "+7 912 345-67-89".into(),
            national_id: "4510 123456".into(),
            email: Some(" Ivan@Example.COM ".into()),
            driver_license: "77ab123456".into(),
            birth_date: Some(d(1990, 5, 20)),
            ..Default::default()
        }
    }

    #[test]
    fn new_customer_gets_code_and_normalized_fields() {
        let c = Customer::new_for_insert(&dto());
        assert!(c.base.code.starts_with("CL-"));
        assert_eq!(c.email.as_deref(), Some("ivan@example.com"));
        assert_eq!(c.driver_license, "77AB123456");
        assert!(c.validate_on(d(2025, 1, 1)).is_ok());
    }

    #[test]
    fn rejects_minor_and_missing_reason() {
        let mut minor = dto();
        minor.birth_date = Some(d(2010, 1, 1));
        assert!(Customer::new_for_insert(&minor).validate_on(d(2025, 1, 1)).is_err());

        let mut c = Customer::new_for_insert(&dto());
        assert!(c.set_blacklist(true, Some("  ".into())).is_err());
        assert!(c.set_blacklist(true, Some("Порча автомобиля".into())).is_ok());
        assert!(c.is_blacklisted);
        c.set_blacklist(false, None).unwrap();
        assert!(c.blacklist_reason.is_none());
    }

    #[test]
    fn duplicate_keys_are_normalized() {
        let c = Customer::new_for_insert(&dto());
        let keys = c.duplicate_keys();
        assert!(keys.contains(&(DuplicateKind::Phone, "79123456789".into())));
        assert!(keys.contains(&(DuplicateKind::NationalId, "4510123456".into())));
    }

    #[test]
    fn license_validity() {
        let mut c = Customer::new_for_insert(&dto());
        assert!(c.license_valid_on(d(2030, 1, 1)));
        c.license_expiry = Some(d(2025, 6, 1));
        assert!(c.license_valid_on(d(2025, 6, 1)));
        assert!(!c.license_valid_on(d(2025, 6, 2)));
    }
}
