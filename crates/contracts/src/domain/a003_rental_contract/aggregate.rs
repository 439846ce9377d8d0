use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::a001_customer::CustomerId;
use crate::domain::a002_vehicle::VehicleId;
use crate::domain::common::{short_code, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::validation::{round_money, validate_date_order, validate_non_negative, validate_positive};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор договора аренды
    RentalContractId
);

/// Коэффициент к суточной ставке за каждый день просрочки возврата
pub const LATE_FEE_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContractStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 3] = [
        ContractStatus::Active,
        ContractStatus::Completed,
        ContractStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "Active",
            ContractStatus::Completed => "Completed",
            ContractStatus::Cancelled => "Cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Active => "Действует",
            ContractStatus::Completed => "Завершён",
            ContractStatus::Cancelled => "Отменён",
        }
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Неизвестный статус договора: {}", s))
    }
}

/// Количество оплачиваемых суток (минимум одни)
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Договор аренды
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalContract {
    #[serde(flatten)]
    pub base: BaseAggregate<RentalContractId>,

    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_rate: f64,
    pub total_amount: f64,
    pub deposit: f64,
    pub paid_amount: f64,
    pub status: ContractStatus,
    pub start_mileage: i64,
    pub end_mileage: Option<i64>,
    pub returned_at: Option<NaiveDate>,
    pub late_fee: f64,
}

impl RentalContract {
    /// Новый договор. Ставка и начальный пробег берутся у автомобиля на момент выдачи.
    pub fn new_for_insert(
        customer_id: CustomerId,
        vehicle_id: VehicleId,
        dto: &RentalContractDto,
        start_mileage: i64,
    ) -> Self {
        let id = RentalContractId::new_v4();
        let code = short_code("RC", id.value());
        let description = dto
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Договор аренды {}", code));
        let mut base = BaseAggregate::new(id, code, description);
        base.comment = dto.comment.clone();

        let mut contract = Self {
            base,
            customer_id,
            vehicle_id,
            start_date: dto.start_date,
            end_date: dto.end_date,
            daily_rate: dto.daily_rate,
            total_amount: 0.0,
            deposit: dto.deposit,
            paid_amount: dto.paid_amount,
            status: ContractStatus::Active,
            start_mileage,
            end_mileage: None,
            returned_at: None,
            late_fee: 0.0,
        };
        contract.recalculate();
        contract
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить условия действующего договора.
    ///
    /// Клиента и автомобиль после выдачи сменить нельзя. Оплаченная сумма не
    /// меняется: каждый платёж проходит через `record_payment` и проводку в журнале.
    pub fn update(&mut self, dto: &RentalContractDto) -> Result<(), String> {
        if self.status != ContractStatus::Active {
            return Err("Изменять можно только действующий договор".into());
        }
        if let Some(description) = dto.description.as_ref().filter(|d| !d.trim().is_empty()) {
            self.base.description = description.trim().to_string();
        }
        self.base.comment = dto.comment.clone();
        self.start_date = dto.start_date;
        self.end_date = dto.end_date;
        self.daily_rate = dto.daily_rate;
        self.deposit = dto.deposit;
        self.recalculate();
        Ok(())
    }

    /// Пересчитать сумму договора по датам и ставке
    pub fn recalculate(&mut self) {
        self.total_amount = round_money(self.rental_days() as f64 * self.daily_rate);
    }

    pub fn rental_days(&self) -> i64 {
        rental_days(self.start_date, self.end_date)
    }

    /// Остаток к оплате (может быть отрицательным при переплате)
    pub fn balance_due(&self) -> f64 {
        round_money(self.total_amount + self.late_fee - self.paid_amount)
    }

    /// Действующий договор, срок возврата по которому прошёл
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == ContractStatus::Active && self.end_date < today
    }

    pub fn days_late(&self, returned_at: NaiveDate) -> i64 {
        (returned_at - self.end_date).num_days().max(0)
    }

    pub fn late_fee_for(&self, returned_at: NaiveDate) -> f64 {
        round_money(self.days_late(returned_at) as f64 * self.daily_rate * LATE_FEE_MULTIPLIER)
    }

    /// Оплачиваемые сутки с учётом фактической даты возврата (минимум одни)
    pub fn billed_days(&self) -> i64 {
        rental_days(self.start_date, self.returned_at.unwrap_or(self.end_date))
    }

    /// Суток аренды, попадающих в период [from, to] включительно.
    ///
    /// Аренда занимает сутки [start, start + billed_days): день возврата не считается.
    pub fn days_within(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        let start = self.start_date.max(from);
        let stop = (self.start_date + Duration::days(self.billed_days())).min(to + Duration::days(1));
        (stop - start).num_days().max(0)
    }

    /// Закрыть договор при возврате автомобиля
    pub fn complete(
        &mut self,
        end_mileage: i64,
        returned_at: NaiveDate,
        extra_payment: f64,
    ) -> Result<(), String> {
        if self.status != ContractStatus::Active {
            return Err("Завершить можно только действующий договор".into());
        }
        if end_mileage < self.start_mileage {
            return Err(format!(
                "Пробег при возврате ({}) меньше пробега при выдаче ({})",
                end_mileage, self.start_mileage
            ));
        }
        if returned_at < self.start_date {
            return Err("Дата возврата раньше даты начала аренды".into());
        }
        validate_non_negative(extra_payment, "Доплата")?;

        self.late_fee = self.late_fee_for(returned_at);
        self.paid_amount = round_money(self.paid_amount + extra_payment);
        self.end_mileage = Some(end_mileage);
        self.returned_at = Some(returned_at);
        self.status = ContractStatus::Completed;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), String> {
        if self.status != ContractStatus::Active {
            return Err("Отменить можно только действующий договор".into());
        }
        self.status = ContractStatus::Cancelled;
        Ok(())
    }

    pub fn record_payment(&mut self, amount: f64) -> Result<(), String> {
        validate_positive(amount, "Сумма платежа")?;
        if self.status == ContractStatus::Cancelled {
            return Err("Нельзя принять оплату по отменённому договору".into());
        }
        self.paid_amount = round_money(self.paid_amount + amount);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_date_order(self.start_date, self.end_date)?;
        validate_positive(self.daily_rate, "Ставка за сутки")?;
        validate_non_negative(self.deposit, "Залог")?;
        validate_non_negative(self.paid_amount, "Оплачено")?;
        if self.paid_amount > self.total_amount + self.late_fee + 0.005 {
            return Err("Оплаченная сумма превышает сумму договора".into());
        }
        if let Some(end) = self.end_mileage {
            if end < self.start_mileage {
                return Err("Пробег при возврате меньше пробега при выдаче".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for RentalContract {
    type Id = RentalContractId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "rental_contract"
    }

    fn element_name() -> &'static str {
        "Договор аренды"
    }

    fn list_name() -> &'static str {
        "Договоры аренды"
    }
}

/// DTO для создания/обновления договора
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RentalContractDto {
    pub id: Option<String>,
    pub description: Option<String>,
    pub customer_id: String,
    pub vehicle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 0 – взять ставку автомобиля
    #[serde(default)]
    pub daily_rate: f64,
    #[serde(default)]
    pub deposit: f64,
    #[serde(default)]
    pub paid_amount: f64,
    pub comment: Option<String>,
}

impl From<&RentalContract> for RentalContractDto {
    fn from(c: &RentalContract) -> Self {
        Self {
            id: Some(c.to_string_id()),
            description: Some(c.base.description.clone()),
            customer_id: c.customer_id.as_string(),
            vehicle_id: c.vehicle_id.as_string(),
            start_date: c.start_date,
            end_date: c.end_date,
            daily_rate: c.daily_rate,
            deposit: c.deposit,
            paid_amount: c.paid_amount,
            comment: c.base.comment.clone(),
        }
    }
}

/// Строка списка договоров с данными клиента и автомобиля
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractListItem {
    pub id: String,
    pub code: String,
    pub customer_id: String,
    pub customer_name: String,
    pub vehicle_id: String,
    pub plate_number: String,
    pub vehicle_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_days: i64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub balance_due: f64,
    pub status: ContractStatus,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteContractRequest {
    pub end_mileage: i64,
    /// По умолчанию – сегодня
    pub returned_at: Option<NaiveDate>,
    #[serde(default)]
    pub extra_payment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn contract() -> RentalContract {
        let dto = RentalContractDto {
            start_date: d(2025, 3, 1),
            end_date: d(2025, 3, 5),
            daily_rate: 2000.0,
            deposit: 5000.0,
            paid_amount: 3000.0,
            ..Default::default()
        };
        RentalContract::new_for_insert(CustomerId::new_v4(), VehicleId::new_v4(), &dto, 10_000)
    }

    #[test]
    fn totals_are_derived_from_dates() {
        let c = contract();
        assert_eq!(c.rental_days(), 4);
        assert_eq!(c.total_amount, 8000.0);
        assert_eq!(c.balance_due(), 5000.0);
        assert!(c.base.code.starts_with("RC-"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn same_day_rental_counts_one_day() {
        assert_eq!(rental_days(d(2025, 1, 1), d(2025, 1, 1)), 1);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut c = contract();
        c.end_date = d(2025, 2, 28);
        assert!(c.validate().is_err());
    }

    #[test]
    fn overdue_only_when_active() {
        let mut c = contract();
        assert!(!c.is_overdue(d(2025, 3, 5)));
        assert!(c.is_overdue(d(2025, 3, 6)));
        c.cancel().unwrap();
        assert!(!c.is_overdue(d(2025, 3, 6)));
    }

    #[test]
    fn late_return_adds_fee() {
        let mut c = contract();
        c.complete(10_450, d(2025, 3, 7), 5000.0).unwrap();
        assert_eq!(c.late_fee, 6000.0);
        assert_eq!(c.status, ContractStatus::Completed);
        assert_eq!(c.balance_due(), 6000.0);
        assert!(c.complete(10_500, d(2025, 3, 8), 0.0).is_err());
    }

    #[test]
    fn complete_rejects_lower_mileage() {
        let mut c = contract();
        assert!(c.complete(9_000, d(2025, 3, 5), 0.0).is_err());
        assert_eq!(c.status, ContractStatus::Active);
    }

    #[test]
    fn update_keeps_paid_amount() {
        let mut c = contract();
        let dto = RentalContractDto {
            start_date: d(2025, 3, 1),
            end_date: d(2025, 3, 6),
            daily_rate: 2000.0,
            deposit: 5000.0,
            paid_amount: 9000.0,
            ..Default::default()
        };
        c.update(&dto).unwrap();
        assert_eq!(c.total_amount, 10_000.0);
        assert_eq!(c.paid_amount, 3000.0);
        assert_eq!(c.balance_due(), 7000.0);
    }

    #[test]
    fn payments() {
        let mut c = contract();
        assert!(c.record_payment(0.0).is_err());
        c.record_payment(5000.0).unwrap();
        assert_eq!(c.balance_due(), 0.0);
    }

    #[test]
    fn days_within_period() {
        let c = contract();
        assert_eq!(c.days_within(d(2025, 3, 1), d(2025, 3, 31)), 4);
        assert_eq!(c.days_within(d(2025, 3, 4), d(2025, 3, 31)), 1);
        assert_eq!(c.days_within(d(2025, 3, 5), d(2025, 3, 31)), 0);
        assert_eq!(c.days_within(d(2025, 4, 1), d(2025, 4, 30)), 0);
    }

    #[test]
    fn days_split_across_months_match_billed_days() {
        let mut c = contract();
        c.start_date = d(2025, 3, 25);
        c.end_date = d(2025, 4, 4);
        c.recalculate();
        let march = c.days_within(d(2025, 3, 1), d(2025, 3, 31));
        let april = c.days_within(d(2025, 4, 1), d(2025, 4, 30));
        assert_eq!((march, april), (7, 3));
        assert_eq!(march + april, c.rental_days());
    }

    #[test]
    fn same_day_rental_occupies_one_day() {
        let mut c = contract();
        c.end_date = c.start_date;
        assert_eq!(c.billed_days(), 1);
        assert_eq!(c.days_within(d(2025, 3, 1), d(2025, 3, 1)), 1);
    }

    #[test]
    fn early_return_shortens_billed_days() {
        let mut c = contract();
        c.complete(10_200, d(2025, 3, 3), 0.0).unwrap();
        assert_eq!(c.billed_days(), 2);
        assert_eq!(c.days_within(d(2025, 3, 1), d(2025, 3, 31)), 2);
    }
}
