//! ViewModel формы клиента (EditDetails MVVM)

use contracts::domain::a001_customer::{Customer, CustomerDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_customer::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::non_empty;

#[derive(Clone, Copy)]
pub struct CustomerDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<String>,
    pub full_name: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub national_id: RwSignal<String>,
    pub email: RwSignal<String>,
    pub driver_license: RwSignal<String>,
    pub license_expiry: RwSignal<String>,
    pub birth_date: RwSignal<String>,
    pub address: RwSignal<String>,
    pub is_blacklisted: RwSignal<bool>,
    pub blacklist_reason: RwSignal<String>,
    pub comment: RwSignal<String>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl CustomerDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            full_name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            national_id: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            driver_license: RwSignal::new(String::new()),
            license_expiry: RwSignal::new(String::new()),
            birth_date: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            is_blacklisted: RwSignal::new(false),
            blacklist_reason: RwSignal::new(String::new()),
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
            match api::fetch_customer(&id).await {
                Ok(customer) => vm.apply(&customer),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить клиента: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, c: &Customer) {
        self.id.set(Some(c.to_string_id()));
        self.code.set(c.base.code.clone());
        self.full_name.set(c.base.description.clone());
        self.phone.set(c.phone.clone());
        self.national_id.set(c.national_id.clone());
        self.email.set(c.email.clone().unwrap_or_default());
        self.driver_license.set(c.driver_license.clone());
        self.license_expiry.set(to_input(&c.license_expiry));
        self.birth_date.set(to_input(&c.birth_date));
        self.address.set(c.address.clone().unwrap_or_default());
        self.is_blacklisted.set(c.is_blacklisted);
        self.blacklist_reason.set(c.blacklist_reason.clone().unwrap_or_default());
        self.comment.set(c.base.comment.clone().unwrap_or_default());
    }

    pub fn to_dto(&self) -> Result<CustomerDto, String> {
        Ok(CustomerDto {
            id: self.id.get(),
            code: non_empty(&self.code.get()),
            description: self.full_name.get().trim().to_string(),
            phone: self.phone.get(),
            national_id: self.national_id.get(),
            email: non_empty(&self.email.get()),
            driver_license: self.driver_license.get(),
            license_expiry: parse_input(&self.license_expiry.get())?,
            birth_date: parse_input(&self.birth_date.get())?,
            address: non_empty(&self.address.get()),
            is_blacklisted: self.is_blacklisted.get(),
            blacklist_reason: non_empty(&self.blacklist_reason.get()),
            comment: non_empty(&self.comment.get()),
        })
    }

    /// Те же правила, что проверяет сервер перед записью
    pub fn validate(&self) -> Result<CustomerDto, String> {
        let dto = self.to_dto()?;
        Customer::new_for_insert(&dto).validate()?;
        Ok(dto)
    }

    /// Ошибка валидации для подсказки под формой
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
            match api::save_customer(&dto).await {
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

impl Default for CustomerDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
