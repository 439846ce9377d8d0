use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerKind, LedgerSummary};
use contracts::domain::common::today;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a007_ledger_entry::ui::details::LedgerEntryDetails;
use crate::domain::a007_ledger_entry::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::shared::components::date_input::{month_range_input, DateRangePicker};
use crate::shared::components::stat_card::{format_money, StatCard};
use crate::shared::components::table_checkbox::{Selection, TableCheckbox, TableHeaderCheckbox};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_naive;
use crate::shared::export::{csv_number, download_server_export, export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_f64, cmp_text, confirm_with_message, get_sort_indicator, records_label, sort_list,
    toggle_sort, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

impl Sortable for LedgerEntry {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "code" => cmp_text(&self.base.code, &other.base.code),
            "kind" => cmp_text(self.kind.label(), other.kind.label()),
            "category" => cmp_text(&self.category, &other.category),
            "description" => cmp_text(&self.base.description, &other.base.description),
            "amount" => cmp_f64(self.signed_amount(), other.signed_amount()),
            _ => self.entry_date.cmp(&other.entry_date),
        }
    }
}

impl ExcelExportable for LedgerEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Номер", "Дата", "Вид", "Категория", "Описание", "Сумма", "Вычет", "Основание"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            format_naive(&self.entry_date),
            self.kind.label().to_string(),
            self.category.clone(),
            self.base.description.clone(),
            csv_number(self.signed_amount()),
            if self.tax_deductible { "да" } else { "" }.to_string(),
            self.reference.clone().unwrap_or_default(),
        ]
    }
}

/// Категории из загруженных проводок
pub fn categories(entries: &[LedgerEntry]) -> Vec<String> {
    let mut result: Vec<String> = entries.iter().map(|e| e.category.clone()).collect();
    result.sort();
    result.dedup();
    result
}

/// Цвет карточки результата: прибыль, убыток или ноль
pub fn net_status(net: f64) -> IndicatorStatus {
    if net > 0.0 {
        IndicatorStatus::Good
    } else if net < 0.0 {
        IndicatorStatus::Bad
    } else {
        IndicatorStatus::Neutral
    }
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn LedgerEntryList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<LedgerEntry>> = RwSignal::new(Vec::new());
    let kind_filter = RwSignal::new(String::new());
    let category_filter = RwSignal::new(String::new());
    let (month_from, month_to) = month_range_input(today(), 0);
    let date_from = RwSignal::new(month_from);
    let date_to = RwSignal::new(month_to);
    let sort_field = RwSignal::new("date".to_string());
    let sort_ascending = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let kind = kind_filter.get_untracked();
        let from = date_from.get_untracked();
        let to = date_to.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_entries(&kind, &from, &to).await {
                Ok(list) => items.set(list),
                Err(e) => error.set(Some(format!("Не удалось загрузить журнал: {}", e))),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        kind_filter.track();
        date_from.track();
        date_to.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let category_options = Signal::derive(move || items.with(|list| categories(list)));

    let visible = Signal::derive(move || {
        let category = category_filter.get();
        let mut data: Vec<LedgerEntry> = items
            .get()
            .into_iter()
            .filter(|e| category.is_empty() || e.category == category)
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });

    let summary = Signal::derive(move || visible.with(|list| LedgerSummary::from_entries(list)));

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
                <LedgerEntryDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Проводка сохранена");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
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
                if let Err(e) = api::delete_entry(id).await {
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
        if let Err(e) = export_to_excel(&visible.get_untracked(), "ledger.csv") {
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
            selection.set_all(visible.get_untracked().iter().map(|e| e.to_string_id()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a007_ledger_entry--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Журнал операций"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || visible.with(|v| v.len()).to_string()}
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
                        <DateRangePicker date_from=date_from date_to=date_to label="Период" />
                        <div style="width: 150px;">
                            <Select value=kind_filter>
                                <option value="">"Все"</option>
                                <option value=LedgerKind::Income.as_str()>{LedgerKind::Income.label()}</option>
                                <option value=LedgerKind::Expense.as_str()>{LedgerKind::Expense.label()}</option>
                            </Select>
                        </div>
                        <div style="width: 180px;">
                            <Select value=category_filter>
                                <option value="">"Все категории"</option>
                                {move || category_options
                                    .get()
                                    .into_iter()
                                    .map(|c| view! { <option value=c.clone()>{c.clone()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                    </Flex>
                </div>
            </div>

            <div class="indicator-set__grid indicator-set__grid--cols-3">
                <StatCard
                    label="Доходы"
                    icon_name="trending-up"
                    value=Signal::derive(move || Some(summary.get().income))
                    format=ValueFormat::rub()
                    status=IndicatorStatus::Good
                />
                <StatCard
                    label="Расходы"
                    icon_name="receipt"
                    value=Signal::derive(move || Some(summary.get().expense))
                    format=ValueFormat::rub()
                    status=IndicatorStatus::Neutral
                />
                <StatCard
                    label="Результат"
                    icon_name="wallet"
                    value=Signal::derive(move || Some(summary.get().net))
                    format=ValueFormat::rub()
                    status=Signal::derive(move || net_status(summary.get().net))
                />
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("code")>
                                    "Номер"
                                    <span class="table__header-sort-indicator">{indicator("code")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("date")>
                                    "Дата"
                                    <span class="table__header-sort-indicator">{indicator("date")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=90.0>
                                <div class="table__sortable-header" on:click=on_sort("kind")>
                                    "Вид"
                                    <span class="table__header-sort-indicator">{indicator("kind")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("category")>
                                    "Категория"
                                    <span class="table__header-sort-indicator">{indicator("category")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=220.0>
                                <div class="table__sortable-header" on:click=on_sort("description")>
                                    "Описание"
                                    <span class="table__header-sort-indicator">{indicator("description")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("amount")>
                                    "Сумма"
                                    <span class="table__header-sort-indicator">{indicator("amount")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=40.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|e| (e.to_string_id(), e.base.metadata.version)
                            children=move |entry| {
                                let id = entry.to_string_id();
                                let id_for_open = id.clone();
                                let expense = entry.kind == LedgerKind::Expense;
                                let automatic = entry.reference.is_some();
                                let code = entry.base.code.clone();
                                let entry_date = format_naive(&entry.entry_date);
                                let kind = entry.kind.label();
                                let category = entry.category.clone();
                                let description = entry.base.description.clone();
                                let amount = format_money(entry.signed_amount());
                                view! {
                                    <TableRow on:click=move |_| open_details(Some(id_for_open.clone()))>
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>{code}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{entry_date}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{kind}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{category}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{description}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class:text--error=expense>{amount}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            {automatic.then(|| view! {
                                                <span title="Автоматическая проводка">{icon("lock")}</span>
                                            })}
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a007_ledger_entry::{LedgerEntryDto, CATEGORY_RENTAL};

    fn entry(kind: LedgerKind, category: &str, amount: f64) -> LedgerEntry {
        LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: NaiveDate::from_ymd_opt(2026, 5, 12).unwrap(),
            kind,
            category: category.into(),
            amount,
            tax_deductible: true,
            ..Default::default()
        })
    }

    #[test]
    fn net_status_follows_sign() {
        assert_eq!(net_status(10.0), IndicatorStatus::Good);
        assert_eq!(net_status(-0.01), IndicatorStatus::Bad);
        assert_eq!(net_status(0.0), IndicatorStatus::Neutral);
    }

    #[test]
    fn categories_are_unique() {
        let list = vec![
            entry(LedgerKind::Income, CATEGORY_RENTAL, 100.0),
            entry(LedgerKind::Expense, "fuel", 50.0),
            entry(LedgerKind::Income, CATEGORY_RENTAL, 10.0),
        ];
        assert_eq!(categories(&list), vec!["fuel".to_string(), "rental".to_string()]);
    }

    #[test]
    fn expense_exports_negative_amount() {
        let e = entry(LedgerKind::Expense, "Fuel", 1500.0);
        let row = e.to_csv_row();
        assert_eq!(row.len(), LedgerEntry::headers().len());
        assert_eq!(row[3], "fuel");
        assert_eq!(row[5], "-1500,00");
        assert_eq!(row[6], "да");
    }
}
