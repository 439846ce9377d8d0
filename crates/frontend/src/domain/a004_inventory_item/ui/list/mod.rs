use contracts::domain::a004_inventory_item::{AdjustStockRequest, InventoryItem};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_inventory_item::ui::details::InventoryItemDetails;
use crate::domain::a004_inventory_item::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::shared::components::stat_card::{format_money, format_thousands};
use crate::shared::components::table_checkbox::{Selection, TableCheckbox, TableHeaderCheckbox};
use crate::shared::components::toast::use_toasts;
use crate::shared::export::{csv_number, download_server_export, export_to_excel, ExcelExportable};
use crate::shared::form_utils::parse_i64;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_f64, cmp_text, confirm_with_message, get_sort_indicator, records_label, sort_list,
    toggle_sort, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

impl Sortable for InventoryItem {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "name" => cmp_text(&self.base.description, &other.base.description),
            "category" => cmp_text(&self.category, &other.category),
            "quantity" => self.quantity.cmp(&other.quantity),
            "min_quantity" => self.min_quantity.cmp(&other.min_quantity),
            "unit_cost" => cmp_f64(self.unit_cost, other.unit_cost),
            "stock_value" => cmp_f64(self.stock_value(), other.stock_value()),
            "location" => cmp_text(
                self.location.as_deref().unwrap_or(""),
                other.location.as_deref().unwrap_or(""),
            ),
            _ => cmp_text(self.sku(), other.sku()),
        }
    }
}

impl ExcelExportable for InventoryItem {
    fn headers() -> Vec<&'static str> {
        vec![
            "Артикул",
            "Наименование",
            "Категория",
            "Остаток",
            "Минимум",
            "Цена",
            "Сумма",
            "Поставщик",
            "Место",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.sku().to_string(),
            self.base.description.clone(),
            self.category.clone(),
            self.quantity.to_string(),
            self.min_quantity.to_string(),
            csv_number(self.unit_cost),
            csv_number(self.stock_value()),
            self.supplier.clone().unwrap_or_default(),
            self.location.clone().unwrap_or_default(),
        ]
    }
}

/// Уникальные категории для фильтра, по алфавиту
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut result: Vec<String> = items.iter().map(|i| i.category.clone()).collect();
    result.sort();
    result.dedup();
    result
}

/// Суммарная стоимость остатков
pub fn stock_total(items: &[InventoryItem]) -> f64 {
    items.iter().map(|i| i.stock_value()).sum()
}

/// Приход или списание в знаковое изменение остатка
pub fn adjust_delta(outgoing: bool, amount: &str) -> Result<i64, String> {
    let amount = parse_i64("Количество", amount)?;
    if amount <= 0 {
        return Err("Количество должно быть больше нуля".into());
    }
    Ok(if outgoing { -amount } else { amount })
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn InventoryItemList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<InventoryItem>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let category_filter = RwSignal::new(String::new());
    let low_only = RwSignal::new(false);
    let sort_field = RwSignal::new("sku".to_string());
    let sort_ascending = RwSignal::new(true);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let query = search.get_untracked();
        let low = low_only.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let result = if low {
                api::fetch_low_stock().await.map(|list| {
                    let count = list.len() as u64;
                    (list, count)
                })
            } else {
                api::fetch_items(&query).await.map(|page| (page.items, page.total))
            };
            match result {
                Ok((list, count)) => {
                    total.set(count);
                    items.set(list);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить склад: {}", e))),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        search.track();
        low_only.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let category_options = Signal::derive(move || items.with(|list| categories(list)));

    let visible = Signal::derive(move || {
        let category = category_filter.get();
        // low-stock endpoint не принимает строку поиска
        let needle = if low_only.get() {
            search.get().trim().to_lowercase()
        } else {
            String::new()
        };
        let mut data: Vec<InventoryItem> = items
            .get()
            .into_iter()
            .filter(|i| category.is_empty() || i.category == category)
            .filter(|i| {
                needle.is_empty()
                    || i.sku().to_lowercase().contains(&needle)
                    || i.base.description.to_lowercase().contains(&needle)
            })
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });

    let low_count = Signal::derive(move || visible.with(|v| v.iter().filter(|i| i.is_low_stock()).count()));
    let value_total = Signal::derive(move || visible.with(|v| stock_total(v)));

    let on_sort = move |field: &'static str| {
        move |_| {
            let (f, asc) =
                toggle_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
            sort_field.set(f);
            sort_ascending.set(asc);
        }
    };
    let indicator = move |field: &'static str| {
        move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())
    };

    let open_details = move |id: Option<String>| {
        modal_stack.push_with_frame(Some(DETAIL_FRAME.to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <InventoryItemDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Позиция сохранена");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let open_adjust = move |item: InventoryItem| {
        modal_stack.push_with_frame(Some("width: 460px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <AdjustStockForm
                    item=item.clone()
                    on_close=Callback::new(move |_| handle.close())
                    on_saved=Callback::new(move |_| {
                        close.close();
                        ctx.bump(COLLECTION);
                    })
                />
            }
            .into_any()
        });
    };

    let delete_selected = move |_| {
        let ids = selection.get();
        if ids.is_empty() || !confirm_with_message(&format!("Удалить {}?", records_label(ids.len()))) {
            return;
        }
        spawn_local(async move {
            let mut failed = Vec::new();
            for id in &ids {
                if let Err(e) = api::delete_item(id).await {
                    failed.push(e);
                }
            }
            if failed.is_empty() {
                toasts.success(format!("Удалено: {}", records_label(ids.len())));
            } else {
                toasts.error(failed.join("; "));
            }
            selection.clear();
            ctx.bump(COLLECTION);
        });
    };

    let export_visible = move |_| {
        if let Err(e) = export_to_excel(&visible.get_untracked(), "inventory.csv") {
            toasts.warning(e);
        }
    };
    let export_all = move |_| {
        spawn_local(async move {
            let result = download_server_export(COLLECTION).await;
            toasts.report(&result, "Выгрузка сформирована");
        });
    };

    let all_checked = Signal::derive(move || {
        let n = visible.with(|v| v.len());
        n > 0 && selection.len() == n
    });
    let on_check_all = Callback::new(move |checked: bool| {
        if checked {
            selection.set_all(visible.get_untracked().iter().map(|i| i.to_string_id()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a004_inventory_item--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Склад"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || format!("{} / {}", visible.with(|v| v.len()), total.get())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " Новая"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=export_visible>
                        {icon("download")}
                        " Excel"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=export_all>
                        {icon("download")}
                        " Выгрузить всё"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=delete_selected
                        disabled=Signal::derive(move || selection.is_empty())
                    >
                        {icon("delete")}
                        {move || format!(" Удалить ({})", selection.len())}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| ctx.bump(COLLECTION)
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="filter-panel">
                <div class="filter-panel-content">
                    <Flex gap=FlexGap::Small align=FlexAlign::End style="flex-wrap: wrap;">
                        <div style="flex: 1; max-width: 300px;">
                            <Input value=search placeholder="Артикул, наименование...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 200px;">
                            <Select value=category_filter>
                                <option value="">"Все категории"</option>
                                {move || category_options
                                    .get()
                                    .into_iter()
                                    .map(|c| view! { <option value=c.clone()>{c.clone()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <Checkbox checked=low_only label="Только дефицит" />
                    </Flex>
                </div>
            </div>

            <div class="table-summary">
                <span>"Стоимость остатков: " <strong>{move || format_money(value_total.get())}</strong></span>
                <span>"Ниже минимума: " <strong>{move || low_count.get()}</strong></span>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("sku")>
                                    "Артикул"
                                    <span class="table__header-sort-indicator">{indicator("sku")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=200.0>
                                <div class="table__sortable-header" on:click=on_sort("name")>
                                    "Наименование"
                                    <span class="table__header-sort-indicator">{indicator("name")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("category")>
                                    "Категория"
                                    <span class="table__header-sort-indicator">{indicator("category")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=90.0>
                                <div class="table__sortable-header" on:click=on_sort("quantity")>
                                    "Остаток"
                                    <span class="table__header-sort-indicator">{indicator("quantity")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=90.0>
                                <div class="table__sortable-header" on:click=on_sort("min_quantity")>
                                    "Минимум"
                                    <span class="table__header-sort-indicator">{indicator("min_quantity")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("unit_cost")>
                                    "Цена"
                                    <span class="table__header-sort-indicator">{indicator("unit_cost")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("stock_value")>
                                    "Сумма"
                                    <span class="table__header-sort-indicator">{indicator("stock_value")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("location")>
                                    "Место"
                                    <span class="table__header-sort-indicator">{indicator("location")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=60.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|i| (i.to_string_id(), i.base.metadata.version)
                            children=move |item| {
                                let id = item.to_string_id();
                                let id_for_open = id.clone();
                                let for_adjust = item.clone();
                                let low = item.is_low_stock();
                                let sku = item.sku().to_string();
                                let description = item.base.description.clone();
                                let category = item.category.clone();
                                let quantity = format_thousands(item.quantity);
                                let min_quantity = format_thousands(item.min_quantity);
                                let unit_cost = format_money(item.unit_cost);
                                let stock_value = format_money(item.stock_value());
                                let location = item.location.clone().unwrap_or_default();
                                view! {
                                    <TableRow on:click=move |_| open_details(Some(id_for_open.clone()))>
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>
                                                <span style="font-weight: 500;">{sku}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{description}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{category}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class:text--error=low>{quantity}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{min_quantity}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{unit_cost}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{stock_value}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{location}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <div on:click=|e| e.stop_propagation()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| open_adjust(for_adjust.clone())
                                                    attr:title="Приход / списание"
                                                >
                                                    {icon("package")}
                                                </Button>
                                            </div>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

/// Приход или списание с обязательной причиной
#[component]
fn AdjustStockForm(item: InventoryItem, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let direction = RwSignal::new("in".to_string());
    let amount = RwSignal::new(String::new());
    let reason = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let item_id = StoredValue::new(item.to_string_id());
    let current = item.quantity;

    let on_save = move |_| {
        let delta = match adjust_delta(direction.get_untracked() == "out", &amount.get_untracked()) {
            Ok(d) => d,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        let reason_text = reason.get_untracked().trim().to_string();
        if reason_text.is_empty() {
            error.set(Some("Укажите причину".into()));
            return;
        }
        saving.set(true);
        error.set(None);
        let id = item_id.get_value();
        let request = AdjustStockRequest {
            delta,
            reason: reason_text,
        };
        spawn_local(async move {
            match api::adjust_stock(&id, &request).await {
                Ok(updated) => {
                    toasts.success(format!("Остаток: {}", format_thousands(updated.quantity)));
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{format!("{} {}", item.sku(), item.base.description)}</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}
            <div class="form__static">{format!("Текущий остаток: {}", format_thousands(current))}</div>
            <div class="form__group">
                <Label>"Операция"</Label>
                <Select value=direction>
                    <option value="in">"Приход"</option>
                    <option value="out">"Списание"</option>
                </Select>
            </div>
            <div class="form__group">
                <Label>"Количество"</Label>
                <Input value=amount />
            </div>
            <div class="form__group">
                <Label>"Причина"</Label>
                <Input value=reason placeholder="Поставка, замена на авто..." />
            </div>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                "Провести"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_inventory_item::InventoryItemDto;

    fn item(sku: &str, category: &str, quantity: i64, unit_cost: f64) -> InventoryItem {
        InventoryItem::new_for_insert(&InventoryItemDto {
            sku: sku.into(),
            name: format!("Позиция {}", sku),
            category: category.into(),
            quantity,
            min_quantity: 2,
            unit_cost,
            ..Default::default()
        })
    }

    #[test]
    fn categories_are_unique_and_sorted() {
        let list = vec![
            item("f-1", "Фильтры", 3, 100.0),
            item("o-1", "Масла", 3, 100.0),
            item("f-2", "Фильтры", 3, 100.0),
        ];
        assert_eq!(categories(&list), vec!["Масла".to_string(), "Фильтры".to_string()]);
    }

    #[test]
    fn stock_total_sums_item_values() {
        let list = vec![item("a", "X", 4, 250.0), item("b", "X", 0, 900.0), item("c", "X", 2, 50.5)];
        assert_eq!(stock_total(&list), 1101.0);
    }

    #[test]
    fn adjust_delta_sign_follows_direction() {
        assert_eq!(adjust_delta(false, "5"), Ok(5));
        assert_eq!(adjust_delta(true, " 3 "), Ok(-3));
        assert!(adjust_delta(true, "0").is_err());
        assert!(adjust_delta(false, "-2").is_err());
        assert!(adjust_delta(false, "abc").is_err());
    }

    #[test]
    fn csv_row_matches_headers() {
        let i = item("oil", "Масла", 10, 3200.0);
        let row = i.to_csv_row();
        assert_eq!(row.len(), InventoryItem::headers().len());
        assert_eq!(row[0], "OIL");
        assert_eq!(row[6], "32000,00");
    }
}
