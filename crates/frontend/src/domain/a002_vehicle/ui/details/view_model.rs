//! ViewModel карточки автомобиля

use contracts::domain::a002_vehicle::{Vehicle, VehicleCategory, VehicleDto, VehicleStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_vehicle::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64, parse_i64, parse_opt_i64};

#[derive(Clone, Copy)]
pub struct VehicleDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub plate_number: RwSignal<String>,
    pub make: RwSignal<String>,
    pub model: RwSignal<String>,
    pub year: RwSignal<String>,
    pub color: RwSignal<String>,
    pub vin: RwSignal<String>,
    pub category: RwSignal<String>,
    /// Статус меняется отдельным действием, в форме только при создании
    pub status: RwSignal<String>,
    pub daily_rate: RwSignal<String>,
    pub mileage: RwSignal<String>,
    pub purchase_price: RwSignal<String>,
    pub purchase_date: RwSignal<String>,
    pub insurance_expiry: RwSignal<String>,
    pub registration_expiry: RwSignal<String>,
    pub next_service_mileage: RwSignal<String>,
    pub comment: RwSignal<String>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl VehicleDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            plate_number: RwSignal::new(String::new()),
            make: RwSignal::new(String::new()),
            model: RwSignal::new(String::new()),
            year: RwSignal::new(contracts::domain::common::today().format("%Y").to_string()),
            color: RwSignal::new(String::new()),
            vin: RwSignal::new(String::new()),
            category: RwSignal::new(VehicleCategory::default().as_str().to_string()),
            status: RwSignal::new(VehicleStatus::default().as_str().to_string()),
            daily_rate: RwSignal::new(String::new()),
            mileage: RwSignal::new("0".to_string()),
            purchase_price: RwSignal::new(String::new()),
            purchase_date: RwSignal::new(String::new()),
            insurance_expiry: RwSignal::new(String::new()),
            registration_expiry: RwSignal::new(String::new()),
            next_service_mileage: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn is_edit_mode(&self) -> Signal<bool> {
        let id = self.id;
        Signal::derive(move || id.get().is_some())
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_vehicle(&id).await {
                Ok(vehicle) => vm.apply(&vehicle),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить автомобиль: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, v: &Vehicle) {
        self.id.set(Some(v.to_string_id()));
        self.plate_number.set(v.plate_number().to_string());
        self.make.set(v.make.clone());
        self.model.set(v.model.clone());
        self.year.set(v.year.to_string());
        self.color.set(v.color.clone().unwrap_or_default());
        self.vin.set(v.vin.clone().unwrap_or_default());
        self.category.set(v.category.as_str().to_string());
        self.status.set(v.status.as_str().to_string());
        self.daily_rate.set(f64_to_input(v.daily_rate));
        self.mileage.set(v.mileage.to_string());
        self.purchase_price.set(f64_to_input(v.purchase_price));
        self.purchase_date.set(to_input(&v.purchase_date));
        self.insurance_expiry.set(to_input(&v.insurance_expiry));
        self.registration_expiry.set(to_input(&v.registration_expiry));
        self.next_service_mileage
            .set(v.next_service_mileage.map(|m| m.to_string()).unwrap_or_default());
        self.comment.set(v.base.comment.clone().unwrap_or_default());
    }

    pub fn to_dto(&self) -> Result<VehicleDto, String> {
        let year = parse_i64("Год выпуска", &self.year.get())?;
        Ok(VehicleDto {
            id: self.id.get(),
            plate_number: self.plate_number.get(),
            make: self.make.get(),
            model: self.model.get(),
            year: i32::try_from(year).map_err(|_| "Год выпуска вне диапазона".to_string())?,
            color: non_empty(&self.color.get()),
            vin: non_empty(&self.vin.get()),
            category: self.category.get().parse()?,
            status: if self.id.get().is_none() {
                Some(self.status.get().parse()?)
            } else {
                None
            },
            daily_rate: parse_f64("Тариф", &self.daily_rate.get())?,
            mileage: parse_i64("Пробег", &self.mileage.get())?,
            purchase_price: parse_f64("Стоимость покупки", &self.purchase_price.get())?,
            purchase_date: parse_input(&self.purchase_date.get())?,
            insurance_expiry: parse_input(&self.insurance_expiry.get())?,
            registration_expiry: parse_input(&self.registration_expiry.get())?,
            next_service_mileage: parse_opt_i64("Пробег следующего ТО", &self.next_service_mileage.get())?,
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<VehicleDto, String> {
        let dto = self.to_dto()?;
        Vehicle::new_for_insert(&dto).validate()?;
        Ok(dto)
    }

    pub fn validation_error(&self) -> Signal<Option<String>> {
        let vm = *self;
        Signal::derive(move || vm.validate().err())
    }

    pub fn is_save_disabled(&self) -> Signal<bool> {
        let vm = *self;
        Signal::derive(move || vm.saving.get() || vm.loading.get() || vm.validate().is_err())
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
            match api::save_vehicle(&dto).await {
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

impl Default for VehicleDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
