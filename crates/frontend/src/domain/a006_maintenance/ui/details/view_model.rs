//! ViewModel записи обслуживания

use contracts::domain::a002_vehicle::{Vehicle, VehicleId};
use contracts::domain::a006_maintenance::{MaintenanceDto, MaintenanceKind, MaintenanceRecord};
use contracts::domain::common::{today, AggregateId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_vehicle::api as vehicle_api;
use crate::domain::a006_maintenance::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64, parse_i64};

#[derive(Clone, Copy)]
pub struct MaintenanceDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<String>,
    pub vehicle_id: RwSignal<String>,
    pub service_date: RwSignal<String>,
    pub kind: RwSignal<String>,
    pub description: RwSignal<String>,
    pub cost: RwSignal<String>,
    pub mileage: RwSignal<String>,
    pub vendor: RwSignal<String>,
    pub comment: RwSignal<String>,

    pub vehicles: RwSignal<Vec<Vehicle>>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl MaintenanceDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            vehicle_id: RwSignal::new(String::new()),
            service_date: RwSignal::new(today().format("%Y-%m-%d").to_string()),
            kind: RwSignal::new(MaintenanceKind::default().as_str().to_string()),
            description: RwSignal::new(String::new()),
            cost: RwSignal::new(String::new()),
            mileage: RwSignal::new(String::new()),
            vendor: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
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

    pub fn load_vehicles(&self) {
        let vm = *self;
        spawn_local(async move {
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
            match api::fetch_record(&id).await {
                Ok(record) => vm.apply(&record),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить запись: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, m: &MaintenanceRecord) {
        self.id.set(Some(m.to_string_id()));
        self.code.set(m.base.code.clone());
        self.vehicle_id.set(m.vehicle_id.as_string());
        self.service_date.set(to_input(&Some(m.service_date)));
        self.kind.set(m.kind.as_str().to_string());
        self.description.set(m.base.description.clone());
        self.cost.set(f64_to_input(m.cost));
        self.mileage.set(m.mileage.to_string());
        self.vendor.set(m.vendor.clone().unwrap_or_default());
        self.comment.set(m.base.comment.clone().unwrap_or_default());
    }

    /// При выборе автомобиля подставляем его текущий пробег
    pub fn select_vehicle(&self, id: String) {
        let mileage = self
            .vehicles
            .with_untracked(|list| list.iter().find(|v| v.to_string_id() == id).map(|v| v.mileage));
        if let Some(km) = mileage {
            if self.mileage.get_untracked().trim().is_empty() {
                self.mileage.set(km.to_string());
            }
        }
        self.vehicle_id.set(id);
    }

    pub fn vehicle_options(&self) -> Signal<Vec<(String, String)>> {
        let vehicles = self.vehicles;
        Signal::derive(move || {
            vehicles.with(|list| {
                list.iter()
                    .map(|v| (v.to_string_id(), format!("{} {}", v.plate_number(), v.base.description)))
                    .collect()
            })
        })
    }

    pub fn to_dto(&self) -> Result<MaintenanceDto, String> {
        let service_date = parse_input(&self.service_date.get())?.ok_or("Укажите дату обслуживания")?;
        Ok(MaintenanceDto {
            id: self.id.get(),
            vehicle_id: self.vehicle_id.get(),
            service_date,
            kind: self.kind.get().parse()?,
            description: self.description.get(),
            cost: parse_f64("Стоимость", &self.cost.get())?,
            mileage: parse_i64("Пробег", &self.mileage.get())?,
            vendor: non_empty(&self.vendor.get()),
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<MaintenanceDto, String> {
        let dto = self.to_dto()?;
        let vehicle_id = VehicleId::from_string(dto.vehicle_id.trim())
            .map_err(|_| "Укажите автомобиль".to_string())?;
        MaintenanceRecord::new_for_insert(vehicle_id, &dto).validate()?;
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
            match api::save_record(&dto).await {
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

impl Default for MaintenanceDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
