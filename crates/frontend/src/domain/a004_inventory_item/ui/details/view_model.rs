use contracts::domain::a004_inventory_item::{InventoryItem, InventoryItemDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a004_inventory_item::api;
use crate::shared::form_utils::{f64_to_input, non_empty, parse_f64, parse_i64};

#[derive(Clone, Copy)]
pub struct InventoryItemDetailsVm {
    pub id: RwSignal<Option<String>>,
    pub sku: RwSignal<String>,
    pub name: RwSignal<String>,
    pub category: RwSignal<String>,
    pub quantity: RwSignal<String>,
    pub min_quantity: RwSignal<String>,
    pub unit_cost: RwSignal<String>,
    pub supplier: RwSignal<String>,
    pub location: RwSignal<String>,
    pub comment: RwSignal<String>,

    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl InventoryItemDetailsVm {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            sku: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            category: RwSignal::new(String::new()),
            quantity: RwSignal::new("0".to_string()),
            min_quantity: RwSignal::new("0".to_string()),
            unit_cost: RwSignal::new(String::new()),
            supplier: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
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
            match api::fetch_item(&id).await {
                Ok(item) => vm.apply(&item),
                Err(e) => vm.error.set(Some(format!("Не удалось загрузить позицию: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    fn apply(&self, item: &InventoryItem) {
        self.id.set(Some(item.to_string_id()));
        self.sku.set(item.sku().to_string());
        self.name.set(item.base.description.clone());
        self.category.set(item.category.clone());
        self.quantity.set(item.quantity.to_string());
        self.min_quantity.set(item.min_quantity.to_string());
        self.unit_cost.set(f64_to_input(item.unit_cost));
        self.supplier.set(item.supplier.clone().unwrap_or_default());
        self.location.set(item.location.clone().unwrap_or_default());
        self.comment.set(item.base.comment.clone().unwrap_or_default());
    }

    pub fn to_dto(&self) -> Result<InventoryItemDto, String> {
        Ok(InventoryItemDto {
            id: self.id.get(),
            sku: self.sku.get(),
            name: self.name.get(),
            category: self.category.get(),
            quantity: parse_i64("Количество", &self.quantity.get())?,
            min_quantity: parse_i64("Минимальный остаток", &self.min_quantity.get())?,
            unit_cost: parse_f64("Цена за единицу", &self.unit_cost.get())?,
            supplier: non_empty(&self.supplier.get()),
            location: non_empty(&self.location.get()),
            comment: non_empty(&self.comment.get()),
        })
    }

    pub fn validate(&self) -> Result<InventoryItemDto, String> {
        let dto = self.to_dto()?;
        InventoryItem::new_for_insert(&dto).validate()?;
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
            match api::save_item(&dto).await {
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

impl Default for InventoryItemDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
