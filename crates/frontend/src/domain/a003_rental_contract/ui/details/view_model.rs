//! ViewModel договора аренды.
//!
//! Для нового договора в выборе только клиенты вне чёрного списка и
//! свободные автомобили. Пустая ставка означает тариф автомобиля.

use contracts::domain::a001_customer::{Customer, CustomerId};
use contracts::domain::a002_vehicle::{Vehicle, VehicleId};
use contracts::domain::a003_rental_contract::{
    rental_days, ContractStatus, RentalContract, RentalContractDto,
};
use contracts::domain::common::{today, AggregateId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_customer::api as customer_api;
use crate::domain::a002_vehicle::api as vehicle_api;
use crate::domain::a003_rental_contract::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64};

#[derive(Clone, Copy)]
pub struct RentalContractDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<String>,
    pub status: RwSignal<ContractStatus>,
    pub description: RwSignal<String>,
    pub customer_id: RwSignal<String>,
    pub vehicle_id: RwSignal<String>,
    pub start_date: RwSignal<String>,
    pub end_date: RwSignal<String>,
    pub daily_rate: RwSignal<String>,
    pub deposit: RwSignal<String>,
    pub paid_amount: RwSignal<String>,
    pub comment: RwSignal<String>,
    /// Данные закрытия (только просмотр)
    pub late_fee: RwSignal<f64>,
    pub start_mileage: RwSignal<i64>,
    pub end_mileage: RwSignal<Option<i64>>,
    pub returned_at: RwSignal<String>,

    pub customers: RwSignal<Vec<Customer>>,
    pub vehicles: RwSignal<Vec<Vehicle>>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl RentalContractDetailsVm {
    pub fn new() -> Self {
        let today = today();
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            status: RwSignal::new(ContractStatus::Active),
            description: RwSignal::new(String::new()),
            customer_id: RwSignal::new(String::new()),
            vehicle_id: RwSignal::new(String::new()),
            start_date: RwSignal::new(to_input(&Some(today))),
            end_date: RwSignal::new(to_input(&today.succ_opt())),
            daily_rate: RwSignal::new(String::new()),
            deposit: RwSignal::new(String::new()),
            paid_amount: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
            late_fee: RwSignal::new(0.0),
            start_mileage: RwSignal::new(0),
            end_mileage: RwSignal::new(None),
            returned_at: RwSignal::new(String::new()),
            customers: RwSignal::new(Vec::new()),
            vehicles: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn is_edit_mode(&self) -> Signal<bool> {
        let id = self.id;
        Signal::derive(move || id.get().is_some())
    }

    /// Закрытый или отменённый договор не редактируется
    pub fn is_read_only(&self) -> Signal<bool> {
        let status = self.status;
        Signal::derive(move || status.get() != ContractStatus::Active)
    }

    /// Справочники для выбора клиента и автомобиля
    pub fn load_references(&self) {
        let vm = *self;
        spawn_local(async move {
            match customer_api::fetch_customers("").await {
                Ok(page) => vm.customers.set(page.items),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить клиентов: {}", e))),
            }
            match vehicle_api::fetch_all_vehicles().await {
                Ok(list) => vm.vehicles.set(list),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить автомобили: {}", e))),
            }
        });
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_contract(&id).await {
                Ok(contract) => vm.apply(&contract),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить договор: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, c: &RentalContract) {
        self.id.set(Some(c.to_string_id()));
        self.code.set(c.base.code.clone());
        self.status.set(c.status);
        self.description.set(c.base.description.clone());
        self.customer_id.set(c.customer_id.as_string());
        self.vehicle_id.set(c.vehicle_id.as_string());
        self.start_date.set(to_input(&Some(c.start_date)));
        self.end_date.set(to_input(&Some(c.end_date)));
        self.daily_rate.set(f64_to_input(c.daily_rate));
        self.deposit.set(f64_to_input(c.deposit));
        self.paid_amount.set(f64_to_input(c.paid_amount));
        self.comment.set(c.base.comment.clone().unwrap_or_default());
        self.late_fee.set(c.late_fee);
        self.start_mileage.set(c.start_mileage);
        self.end_mileage.set(c.end_mileage);
        self.returned_at.set(to_input(&c.returned_at));
    }

    /// Клиенты для выбора: без чёрного списка, плюс текущий клиент договора
    pub fn customer_options(&self) -> Signal<Vec<(String, String)>> {
        let vm = *self;
        Signal::derive(move || {
            let current = vm.customer_id.get();
            vm.customers.with(|list| {
                list.iter()
                    .filter(|c| !c.is_blacklisted || c.to_string_id() == current)
                    .map(|c| (c.to_string_id(), format!("{} ({})", c.full_name(), c.phone)))
                    .collect()
            })
        })
    }

    /// Свободные автомобили, плюс автомобиль договора
    pub fn vehicle_options(&self) -> Signal<Vec<(String, String)>> {
        let vm = *self;
        Signal::derive(move || {
            let current = vm.vehicle_id.get();
            vm.vehicles.with(|list| {
                list.iter()
                    .filter(|v| v.is_rentable() || v.to_string_id() == current)
                    .map(|v| (v.to_string_id(), vehicle_option_label(v)))
                    .collect()
            })
        })
    }

    fn selected_vehicle(&self) -> Option<Vehicle> {
        let id = self.vehicle_id.get();
        self.vehicles
            .with(|list| list.iter().find(|v| v.to_string_id() == id).cloned())
    }

    fn selected_customer(&self) -> Option<Customer> {
        let id = self.customer_id.get();
        self.customers
            .with(|list| list.iter().find(|c| c.to_string_id() == id).cloned())
    }

    /// Ставка из формы, а если поле пустое или 0, то тариф автомобиля
    pub fn effective_rate(&self) -> Result<f64, String> {
        let rate = parse_f64("Ставка", &self.daily_rate.get())?;
        if rate > 0.0 {
            return Ok(rate);
        }
        Ok(self.selected_vehicle().map(|v| v.daily_rate).unwrap_or(0.0))
    }

    pub fn to_dto(&self) -> Result<RentalContractDto, String> {
        let customer_id = non_empty(&self.customer_id.get()).ok_or("Выберите клиента")?;
        let vehicle_id = non_empty(&self.vehicle_id.get()).ok_or("Выберите автомобиль")?;
        let start_date = parse_input(&self.start_date.get())?.ok_or("Укажите дату начала")?;
        let end_date = parse_input(&self.end_date.get())?.ok_or("Укажите дату окончания")?;
        Ok(RentalContractDto {
            id: self.id.get(),
            description: non_empty(&self.description.get()),
            customer_id,
            vehicle_id,
            start_date,
            end_date,
            daily_rate: self.effective_rate()?,
            deposit: parse_f64("Залог", &self.deposit.get())?,
            paid_amount: parse_f64("Оплачено", &self.paid_amount.get())?,
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<RentalContractDto, String> {
        let dto = self.to_dto()?;
        let customer_id = CustomerId::from_string(&dto.customer_id)?;
        let vehicle_id = VehicleId::from_string(&dto.vehicle_id)?;
        RentalContract::new_for_insert(customer_id, vehicle_id, &dto, 0).validate()?;
        if self.id.get().is_none() {
            if let Some(customer) = self.selected_customer() {
                if customer.is_blacklisted {
                    return Err("Клиент в чёрном списке".into());
                }
                if !customer.license_valid_on(dto.end_date) {
                    return Err("Водительское удостоверение истекает до окончания аренды".into());
                }
            }
        }
        Ok(dto)
    }

    pub fn validation_error(&self) -> Signal<Option<String>> {
        let vm = *self;
        Signal::derive(move || vm.validate().err())
    }

    /// Предпросмотр: (суток, сумма)
    pub fn preview(&self) -> Signal<Option<(i64, f64)>> {
        let vm = *self;
        Signal::derive(move || {
            let start = parse_input(&vm.start_date.get()).ok().flatten()?;
            let end = parse_input(&vm.end_date.get()).ok().flatten()?;
            let rate = vm.effective_rate().ok()?;
            let days = rental_days(start, end);
            Some((days, days as f64 * rate))
        })
    }

    pub fn is_save_disabled(&self) -> Signal<bool> {
        let vm = *self;
        Signal::derive(move || {
            vm.saving.get()
                || vm.loading.get()
                || vm.status.get() != ContractStatus::Active
                || vm.validate().is_err()
        })
    }

    pub fn save(&self, on_saved: Callback<()>) {
        let vm = *self;
        let dto = match vm.validate() {
            Ok(dto) => dto,
            Err(e) => {
                vm.error.set(Some(e));
                return;
            }
        };
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            match api::save_contract(&dto).await {
                Ok(id) => {
                    vm.id.set(Some(id));
                    on_saved.run(());
                }
                Err(e) => vm.error.set(Some(e)),
            }
            vm.saving.set(false);
        });
    }
}

impl Default for RentalContractDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}

pub fn vehicle_option_label(v: &Vehicle) -> String {
    format!("{} {} ({} ₽/сут)", v.plate_number(), v.base.description, v.daily_rate)
}
