use contracts::domain::a003_rental_contract::{ContractListItem, ContractStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_rental_contract::ui::actions::{CompleteContractForm, PaymentForm};
use crate::domain::a003_rental_contract::ui::details::RentalContractDetails;
use crate::domain::a003_rental_contract::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_labels::{tab_title_for_key, CONTRACT_PRINT_PREFIX};
use crate::shared::components::stat_card::format_money;
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
use crate::system::email::api::channel_message;

impl Sortable for ContractListItem {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "code" => cmp_text(&self.code, &other.code),
            "customer" => cmp_text(&self.customer_name, &other.customer_name),
            "vehicle" => cmp_text(&self.plate_number, &other.plate_number),
            "end_date" => self.end_date.cmp(&other.end_date),
            "total_amount" => cmp_f64(self.total_amount, other.total_amount),
            "balance_due" => cmp_f64(self.balance_due, other.balance_due),
            "status" => cmp_text(self.status.label(), other.status.label()),
            _ => self.start_date.cmp(&other.start_date),
        }
    }
}

impl ExcelExportable for ContractListItem {
    fn headers() -> Vec<&'static str> {
        vec![
            "Номер",
            "Клиент",
            "Госномер",
            "Автомобиль",
            "Начало",
            "Окончание",
            "Суток",
            "Сумма",
            "Оплачено",
            "Остаток",
            "Статус",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.customer_name.clone(),
            self.plate_number.clone(),
            self.vehicle_name.clone(),
            format_naive(&self.start_date),
            format_naive(&self.end_date),
            self.rental_days.to_string(),
            csv_number(self.total_amount),
            csv_number(self.paid_amount),
            csv_number(self.balance_due),
            self.status.label().to_string(),
        ]
    }
}

pub fn status_class(item: &ContractListItem) -> &'static str {
    match item.status {
        ContractStatus::Active if item.is_overdue => "badge badge--error",
        ContractStatus::Active => "badge badge--info",
        ContractStatus::Completed => "badge badge--success",
        ContractStatus::Cancelled => "badge badge--neutral",
    }
}

/// Итоги по видимым строкам: (сумма, оплачено, остаток)
pub fn totals(items: &[ContractListItem]) -> (f64, f64, f64) {
    items.iter().fold((0.0, 0.0, 0.0), |(t, p, b), i| {
        (t + i.total_amount, p + i.paid_amount, b + i.balance_due.max(0.0))
    })
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn RentalContractList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<ContractListItem>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let status_filter = RwSignal::new(ContractStatus::Active.as_str().to_string());
    let overdue_only = RwSignal::new(false);
    let sort_field = RwSignal::new("start_date".to_string());
    let sort_ascending = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let query = search.get_untracked();
        let status = status_filter.get_untracked().parse::<ContractStatus>().ok();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_contracts(status, &query).await {
                Ok(page) => {
                    total.set(page.total);
                    items.set(page.items);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить договоры: {}", e))),
            }
            loading.set(false);
        });
    };

    // Смена статуса автомобиля и клиента тоже влияет на строки списка
    Effect::new(move |_| {
        search.track();
        status_filter.track();
        ctx.revision(COLLECTION);
        ctx.revision("vehicle");
        ctx.revision("customer");
        load_data();
    });

    let visible = Signal::derive(move || {
        let only_overdue = overdue_only.get();
        let mut data: Vec<ContractListItem> = items
            .get()
            .into_iter()
            .filter(|i| !only_overdue || i.is_overdue)
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });
    let sums = Signal::derive(move || visible.with(|v| totals(v)));

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
                <RentalContractDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Договор сохранён");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let open_complete = move |item: ContractListItem| {
        modal_stack.push_with_frame(Some("width: 460px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <CompleteContractForm
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

    let open_payment = move |item: ContractListItem| {
        modal_stack.push_with_frame(Some("width: 400px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <PaymentForm
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

    let cancel = move |item: ContractListItem| {
        if !confirm_with_message(&format!("Отменить договор {}? Автомобиль станет свободен.", item.code)) {
            return;
        }
        spawn_local(async move {
            let result = api::cancel_contract(&item.id).await;
            toasts.report(&result, "Договор отменён");
            ctx.bump(COLLECTION);
        });
    };

    let send_email = move |item: ContractListItem| {
        spawn_local(async move {
            match api::email_summary(&item.id).await {
                Ok(response) => toasts.info(channel_message(&response.channel)),
                Err(e) => toasts.error(e),
            }
        });
    };

    let open_print = move |item: ContractListItem| {
        let key = format!("{}{}", CONTRACT_PRINT_PREFIX, item.id);
        ctx.open_tab(&key, &tab_title_for_key(&key));
    };

    let delete_selected = move |_| {
        let ids = selection.get();
        if ids.is_empty() || !confirm_with_message(&format!("Удалить {}?", records_label(ids.len()))) {
            return;
        }
        spawn_local(async move {
            let mut failed = Vec::new();
            for id in &ids {
                if let Err(e) = api::delete_contract(id).await {
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
        if let Err(e) = export_to_excel(&visible.get_untracked(), "contracts.csv") {
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
            selection.set_all(visible.get_untracked().iter().map(|i| i.id.clone()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a003_rental_contract--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Договоры аренды"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || format!("{} / {}", visible.with(|v| v.len()), total.get())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " Новый"
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
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div style="flex: 1; max-width: 320px;">
                            <Input value=search placeholder="Номер, клиент, госномер...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 180px;">
                            <Select value=status_filter>
                                <option value="">"Все статусы"</option>
                                {ContractStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <Checkbox checked=overdue_only label="Только просроченные" />
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <div class="table-summary">
                    <span>{move || format!("Сумма: {}", format_money(sums.get().0))}</span>
                    <span>{move || format!("Оплачено: {}", format_money(sums.get().1))}</span>
                    <span>{move || format!("К оплате: {}", format_money(sums.get().2))}</span>
                </div>
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("code")>
                                    "Номер"
                                    <span class="table__header-sort-indicator">{indicator("code")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=170.0>
                                <div class="table__sortable-header" on:click=on_sort("customer")>
                                    "Клиент"
                                    <span class="table__header-sort-indicator">{indicator("customer")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=170.0>
                                <div class="table__sortable-header" on:click=on_sort("vehicle")>
                                    "Автомобиль"
                                    <span class="table__header-sort-indicator">{indicator("vehicle")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=170.0>
                                <div class="table__sortable-header" on:click=on_sort("start_date")>
                                    "Период"
                                    <span class="table__header-sort-indicator">{indicator("start_date")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("total_amount")>
                                    "Сумма"
                                    <span class="table__header-sort-indicator">{indicator("total_amount")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("balance_due")>
                                    "Остаток"
                                    <span class="table__header-sort-indicator">{indicator("balance_due")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("status")>
                                    "Статус"
                                    <span class="table__header-sort-indicator">{indicator("status")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=200.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|i| (i.id.clone(), i.status, i.paid_amount.to_bits(), i.end_date)
                            children=move |item| {
                                let id = item.id.clone();
                                let id_for_open = id.clone();
                                let active = item.status == ContractStatus::Active;
                                let closed = !active;
                                let cancelled = item.status == ContractStatus::Cancelled;
                                let owes = item.balance_due > 0.0;
                                let badge = status_class(&item);
                                let status_text = if item.is_overdue {
                                    "Просрочен".to_string()
                                } else {
                                    item.status.label().to_string()
                                };
                                let for_complete = item.clone();
                                let for_payment = item.clone();
                                let for_cancel = item.clone();
                                let for_email = item.clone();
                                let for_print = item.clone();
                                view! {
                                    <TableRow
                                        class:table__row--muted=closed
                                        on:click=move |_| open_details(Some(id_for_open.clone()))
                                    >
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>{item.code.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{item.customer_name.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {format!("{} {}", item.plate_number, item.vehicle_name)}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {format!(
                                                    "{} – {} ({} сут.)",
                                                    format_naive(&item.start_date),
                                                    format_naive(&item.end_date),
                                                    item.rental_days
                                                )}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_money(item.total_amount)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class:text--error=owes>{format_money(item.balance_due)}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span class=badge>{status_text}</span>
                                        </TableCell>
                                        <TableCell>
                                            <div on:click=|e| e.stop_propagation()>
                                                <Show when=move || active>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click={
                                                            let item = for_complete.clone();
                                                            move |_| open_complete(item.clone())
                                                        }
                                                        attr:title="Закрыть договор"
                                                    >
                                                        {icon("check")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click={
                                                            let item = for_cancel.clone();
                                                            move |_| cancel(item.clone())
                                                        }
                                                        attr:title="Отменить"
                                                    >
                                                        {icon("x")}
                                                    </Button>
                                                </Show>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| open_payment(for_payment.clone())
                                                    disabled=cancelled
                                                    attr:title="Принять оплату"
                                                >
                                                    {icon("wallet")}
                                                </Button>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| send_email(for_email.clone())
                                                    attr:title="Отправить клиенту"
                                                >
                                                    {icon("mail")}
                                                </Button>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| open_print(for_print.clone())
                                                    attr:title="Печать"
                                                >
                                                    {icon("printer")}
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(status: ContractStatus, overdue: bool, total: f64, paid: f64) -> ContractListItem {
        let d = |day| NaiveDate::from_ymd_opt(2025, 4, day).unwrap();
        ContractListItem {
            id: format!("{}-{}", total, paid),
            code: "RC-00000001".into(),
            customer_name: "Иванов".into(),
            customer_id: "c".into(),
            vehicle_id: "v".into(),
            plate_number: "A001AA77".into(),
            vehicle_name: "Kia Rio".into(),
            start_date: d(1),
            end_date: d(3),
            rental_days: 2,
            total_amount: total,
            paid_amount: paid,
            balance_due: total - paid,
            status,
            is_overdue: overdue,
        }
    }

    #[test]
    fn overdue_contract_is_highlighted() {
        assert_eq!(status_class(&item(ContractStatus::Active, true, 1.0, 0.0)), "badge badge--error");
        assert_eq!(status_class(&item(ContractStatus::Active, false, 1.0, 0.0)), "badge badge--info");
        assert_eq!(status_class(&item(ContractStatus::Completed, false, 1.0, 1.0)), "badge badge--success");
    }

    #[test]
    fn totals_ignore_overpayment_in_balance() {
        let rows = vec![
            item(ContractStatus::Active, false, 5000.0, 2000.0),
            item(ContractStatus::Completed, false, 3000.0, 3500.0),
        ];
        assert_eq!(totals(&rows), (8000.0, 5500.0, 3000.0));
    }

    #[test]
    fn csv_row_matches_headers() {
        let row = item(ContractStatus::Cancelled, false, 4000.0, 0.0).to_csv_row();
        assert_eq!(row.len(), ContractListItem::headers().len());
        assert_eq!(row[4], "01.04.2025");
        assert_eq!(row[10], "Отменён");
    }
}
