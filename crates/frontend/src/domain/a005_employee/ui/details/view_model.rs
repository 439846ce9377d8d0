use contracts::domain::a005_employee::{Employee, EmployeeDto, EmployeeStatus};
use contracts::domain::common::today;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a005_employee::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64};

#[derive(Clone, Copy)]
pub struct EmployeeDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<String>,
    pub full_name: RwSignal<String>,
    pub position: RwSignal<String>,
    pub department: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub national_id: RwSignal<String>,
    pub email: RwSignal<String>,
    pub hire_date: RwSignal<String>,
    pub salary: RwSignal<String>,
    pub status: RwSignal<String>,
    pub termination_date: RwSignal<String>,
    pub comment: RwSignal<String>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl EmployeeDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            full_name: RwSignal::new(String::new()),
            position: RwSignal::new(String::new()),
            department: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            national_id: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            hire_date: RwSignal::new(today().format("%Y-%m-%d").to_string()),
            salary: RwSignal::new(String::new()),
            status: RwSignal::new(EmployeeStatus::default().as_str().to_string()),
            termination_date: RwSignal::new(String::new()),
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

    /// Дата увольнения нужна только для статуса "Уволен"
    pub fn is_terminated(&self) -> Signal<bool> {
        let status = self.status;
        Signal::derive(move || status.get() == EmployeeStatus::Terminated.as_str())
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_employee(&id).await {
                Ok(employee) => vm.apply(&employee),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить сотрудника: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, e: &Employee) {
        self.id.set(Some(e.to_string_id()));
        self.code.set(e.base.code.clone());
        self.full_name.set(e.base.description.clone());
        self.position.set(e.position.clone());
        self.department.set(e.department.clone());
        self.phone.set(e.phone.clone());
        self.national_id.set(e.national_id.clone());
        self.email.set(e.email.clone().unwrap_or_default());
        self.hire_date.set(to_input(&Some(e.hire_date)));
        self.salary.set(f64_to_input(e.salary));
        self.status.set(e.status.as_str().to_string());
        self.termination_date.set(to_input(&e.termination_date));
        self.comment.set(e.base.comment.clone().unwrap_or_default());
    }

    pub fn to_dto(&self) -> Result<EmployeeDto, String> {
        let hire_date = parse_input(&self.hire_date.get())?.ok_or("Укажите дату приёма")?;
        Ok(EmployeeDto {
            id: self.id.get(),
            code: non_empty(&self.code.get()),
            full_name: self.full_name.get(),
            position: self.position.get(),
            department: self.department.get(),
            phone: self.phone.get(),
            national_id: self.national_id.get(),
            email: non_empty(&self.email.get()),
            hire_date,
            salary: parse_f64("Оклад", &self.salary.get())?,
            status: self.status.get().parse()?,
            termination_date: parse_input(&self.termination_date.get())?,
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<EmployeeDto, String> {
        let dto = self.to_dto()?;
        Employee::new_for_insert(&dto).validate()?;
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
            match api::save_employee(&dto).await {
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

impl Default for EmployeeDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
