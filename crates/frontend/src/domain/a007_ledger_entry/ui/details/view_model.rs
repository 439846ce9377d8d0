use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerEntryDto, LedgerKind};
use contracts::domain::common::today;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a007_ledger_entry::api;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64};

#[derive(Clone, Copy)]
pub struct LedgerEntryDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<String>,
    pub entry_date: RwSignal<String>,
    pub kind: RwSignal<String>,
    pub category: RwSignal<String>,
    pub amount: RwSignal<String>,
    pub tax_deductible: RwSignal<bool>,
    pub description: RwSignal<String>,
    /// Договор или запись обслуживания, создавшие проводку
    pub reference: RwSignal<Option<String>>,
    pub comment: RwSignal<String>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl LedgerEntryDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            entry_date: RwSignal::new(today().format("%Y-%m-%d").to_string()),
            kind: RwSignal::new(LedgerKind::Expense.as_str().to_string()),
            category: RwSignal::new(String::new()),
            amount: RwSignal::new(String::new()),
            tax_deductible: RwSignal::new(true),
            description: RwSignal::new(String::new()),
            reference: RwSignal::new(None),
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

    /// Автоматические проводки меняются только через исходную операцию
    pub fn is_read_only(&self) -> Signal<bool> {
        let reference = self.reference;
        Signal::derive(move || reference.with(|r| r.is_some()))
    }

    pub fn is_expense(&self) -> Signal<bool> {
        let kind = self.kind;
        Signal::derive(move || kind.get() == LedgerKind::Expense.as_str())
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_entry(&id).await {
                Ok(entry) => vm.apply(&entry),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить проводку: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, e: &LedgerEntry) {
        self.id.set(Some(e.to_string_id()));
        self.code.set(e.base.code.clone());
        self.entry_date.set(to_input(&Some(e.entry_date)));
        self.kind.set(e.kind.as_str().to_string());
        self.category.set(e.category.clone());
        self.amount.set(f64_to_input(e.amount));
        self.tax_deductible.set(e.tax_deductible);
        self.description.set(e.base.description.clone());
        self.reference.set(e.reference.clone());
        self.comment.set(e.base.comment.clone().unwrap_or_default());
    }

    pub fn to_dto(&self) -> Result<LedgerEntryDto, String> {
        let entry_date = parse_input(&self.entry_date.get())?.ok_or("Укажите дату проводки")?;
        Ok(LedgerEntryDto {
            id: self.id.get(),
            entry_date,
            kind: self.kind.get().parse()?,
            category: self.category.get(),
            amount: parse_f64("Сумма", &self.amount.get())?,
            tax_deductible: self.tax_deductible.get(),
            description: self.description.get(),
            reference: self.reference.get(),
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<LedgerEntryDto, String> {
        let dto = self.to_dto()?;
        LedgerEntry::new_for_insert(&dto).validate()?;
        Ok(dto)
    }

    pub fn validation_error(&self) -> Signal<Option<String>> {
        let vm = *self;
        Signal::derive(move || vm.validate().err())
    }

    pub fn is_save_disabled(&self) -> Signal<bool> {
        let vm = *self;
        let read_only = vm.is_read_only();
        Signal::derive(move || {
            read_only.get() || vm.saving.get() || vm.loading.get() || vm.validate().is_err()
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
            match api::save_entry(&dto).await {
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

impl Default for LedgerEntryDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
