use contracts::domain::a001_customer::{BlacklistRequest, Customer};
use contracts::shared::duplicates::DuplicateGroup;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_customer::ui::details::CustomerDetails;
use crate::domain::a001_customer::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::shared::components::table_checkbox::{Selection, TableCheckbox, TableHeaderCheckbox};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_opt_date;
use crate::shared::export::{download_server_export, export_to_excel, ExcelExportable};
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, confirm_with_message, get_sort_indicator, records_label, sort_list, toggle_sort,
    Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

impl Sortable for Customer {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "code" => cmp_text(&self.base.code, &other.base.code),
            "phone" => self.phone.cmp(&other.phone),
            "driver_license" => cmp_text(&self.driver_license, &other.driver_license),
            "license_expiry" => self.license_expiry.cmp(&other.license_expiry),
            "is_blacklisted" => self.is_blacklisted.cmp(&other.is_blacklisted),
            _ => cmp_text(self.full_name(), other.full_name()),
        }
    }
}

impl ExcelExportable for Customer {
    fn headers() -> Vec<&'static str> {
        vec![
            "Код",
            "ФИО",
            "Телефон",
            "Паспорт",
            "Email",
            "ВУ",
            "ВУ до",
            "Чёрный список",
            "Причина",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.full_name().to_string(),
            self.phone.clone(),
            self.national_id.clone(),
            self.email.clone().unwrap_or_default(),
            self.driver_license.clone(),
            format_opt_date(&self.license_expiry),
            if self.is_blacklisted { "Да" } else { "Нет" }.to_string(),
            self.blacklist_reason.clone().unwrap_or_default(),
        ]
    }
}

/// Фильтр по чёрному списку: "", "active", "blacklisted"
pub fn matches_blacklist_filter(customer: &Customer, filter: &str) -> bool {
    match filter {
        "active" => !customer.is_blacklisted,
        "blacklisted" => customer.is_blacklisted,
        _ => true,
    }
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn CustomerList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<Customer>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let blacklist_filter = RwSignal::new(String::new());
    let sort_field = RwSignal::new("name".to_string());
    let sort_ascending = RwSignal::new(true);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let query = search.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_customers(&query).await {
                Ok(page) => {
                    total.set(page.total);
                    items.set(page.items);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить клиентов: {}", e))),
            }
            loading.set(false);
        });
    };

    // Поиск на сервере; перезагрузка также по событию изменения коллекции
    Effect::new(move |_| {
        search.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let visible = Signal::derive(move || {
        let filter = blacklist_filter.get();
        let mut data: Vec<Customer> = items
            .get()
            .into_iter()
            .filter(|c| matches_blacklist_filter(c, &filter))
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });

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
                <CustomerDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Клиент сохранён");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let open_duplicates = move |_| {
        modal_stack.push_with_frame(Some("width: min(760px, 95vw);".to_string()), move |handle| {
            view! {
                <DuplicatesView
                    on_open=Callback::new(move |id: String| open_details(Some(id)))
                    on_close=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let toggle_blacklist = move |customer: Customer| {
        let id = customer.to_string_id();
        if customer.is_blacklisted {
            if !confirm_with_message(&format!("Исключить {} из чёрного списка?", customer.full_name())) {
                return;
            }
            spawn_local(async move {
                let request = BlacklistRequest { is_blacklisted: false, reason: None };
                let result = api::set_blacklist(&id, &request).await;
                toasts.report(&result, "Клиент исключён из чёрного списка");
                ctx.bump(COLLECTION);
            });
            return;
        }
        let name = customer.full_name().to_string();
        modal_stack.push_with_frame(Some("width: 440px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <BlacklistForm
                    customer_id=id.clone()
                    customer_name=name.clone()
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
        if ids.is_empty() {
            return;
        }
        if !confirm_with_message(&format!("Удалить {}?", records_label(ids.len()))) {
            return;
        }
        spawn_local(async move {
            let mut failed = Vec::new();
            for id in &ids {
                if let Err(e) = api::delete_customer(id).await {
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
        let result = export_to_excel(&visible.get_untracked(), "customers.csv");
        if let Err(e) = result {
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
            selection.set_all(visible.get_untracked().iter().map(|c| c.to_string_id()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a001_customer--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Клиенты"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || format!("{} / {}", visible.with(|v| v.len()), total.get())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " Новый"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=open_duplicates>
                        {icon("filter")}
                        " Дубли"
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
                        <div style="flex: 1; max-width: 360px;">
                            <Input value=search placeholder="ФИО, телефон, паспорт, ВУ...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 200px;">
                            <Select value=blacklist_filter>
                                <option value="">"Все клиенты"</option>
                                <option value="active">"Без ограничений"</option>
                                <option value="blacklisted">"Чёрный список"</option>
                            </Select>
                        </div>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("code")>
                                    "Код"
                                    <span class="table__header-sort-indicator">{indicator("code")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=200.0>
                                <div class="table__sortable-header" on:click=on_sort("name")>
                                    "ФИО"
                                    <span class="table__header-sort-indicator">{indicator("name")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=140.0>
                                <div class="table__sortable-header" on:click=on_sort("phone")>
                                    "Телефон"
                                    <span class="table__header-sort-indicator">{indicator("phone")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=130.0>
                                <div class="table__sortable-header" on:click=on_sort("driver_license")>
                                    "ВУ"
                                    <span class="table__header-sort-indicator">{indicator("driver_license")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("license_expiry")>
                                    "ВУ до"
                                    <span class="table__header-sort-indicator">{indicator("license_expiry")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("is_blacklisted")>
                                    "Статус"
                                    <span class="table__header-sort-indicator">{indicator("is_blacklisted")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|c| (c.to_string_id(), c.base.metadata.version)
                            children=move |customer| {
                                let id = customer.to_string_id();
                                let id_for_open = id.clone();
                                let for_blacklist = customer.clone();
                                let blacklisted = customer.is_blacklisted;
                                let license_expired = !customer.license_valid_on(contracts::domain::common::today());
                                let code = customer.base.code.clone();
                                let full_name = customer.full_name().to_string();
                                let phone = customer.phone.clone();
                                let driver_license = customer.driver_license.clone();
                                let license_expiry = format_opt_date(&customer.license_expiry);
                                view! {
                                    <TableRow
                                        class:table__row--muted=blacklisted
                                        on:click=move |_| open_details(Some(id_for_open.clone()))
                                    >
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>{code}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style="font-weight: 500;">{full_name}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{phone}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{driver_license}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class:text--error=license_expired>
                                                    {license_expiry}
                                                </span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            {if blacklisted {
                                                view! { <span class="badge badge--error">"Чёрный список"</span> }.into_any()
                                            } else {
                                                view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                            }}
                                        </TableCell>
                                        <TableCell>
                                            <div on:click=|e| e.stop_propagation()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| toggle_blacklist(for_blacklist.clone())
                                                    attr:title=if blacklisted { "Исключить из чёрного списка" } else { "В чёрный список" }
                                                >
                                                    {icon(if blacklisted { "unlock" } else { "lock" })}
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

/// Внесение клиента в чёрный список с обязательной причиной
#[component]
fn BlacklistForm(
    customer_id: String,
    customer_name: String,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toasts = use_toasts();
    let reason = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let customer_id = StoredValue::new(customer_id);

    let on_save = move |_| {
        let Some(reason_text) = non_empty(&reason.get_untracked()) else {
            error.set(Some("Укажите причину внесения в чёрный список".into()));
            return;
        };
        saving.set(true);
        error.set(None);
        let id = customer_id.get_value();
        spawn_local(async move {
            let request = BlacklistRequest {
                is_blacklisted: true,
                reason: Some(reason_text),
            };
            match api::set_blacklist(&id, &request).await {
                Ok(()) => {
                    toasts.success("Клиент внесён в чёрный список");
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">"Чёрный список"</h2>
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
            <p>{customer_name}</p>
            <div class="form__group">
                <Label>"Причина"</Label>
                <Textarea value=reason attr:rows=3 />
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
                "Внести"
            </Button>
        </div>
    }
}

/// Группы клиентов с совпадающим телефоном, паспортом или email
#[component]
fn DuplicatesView(on_open: Callback<String>, on_close: Callback<()>) -> impl IntoView {
    let groups: RwSignal<Vec<DuplicateGroup>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    spawn_local(async move {
        match api::fetch_duplicates().await {
            Ok(data) => groups.set(data),
            Err(e) => error.set(Some(e)),
        }
        loading.set(false);
    });

    view! {
        <div class="modal-header">
            <h2 class="modal-title">"Возможные дубли"</h2>
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
            <Show when=move || loading.get()>
                <Spinner />
            </Show>
            <Show when=move || !loading.get() && groups.with(|g| g.is_empty()) && error.get().is_none()>
                <div class="placeholder">"Дублей не найдено"</div>
            </Show>
            <Table attr:style="width: 100%;">
                <TableBody>
                    <For
                        each=move || groups.get()
                        key=|g| (g.kind, g.key.clone())
                        children=move |group| {
                            let members: Vec<(String, String)> = group
                                .ids
                                .iter()
                                .cloned()
                                .zip(group.names.iter().cloned())
                                .collect();
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <span class="badge badge--warning">{group.kind.label()}</span>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout>{group.key.clone()}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        {members
                                            .into_iter()
                                            .map(|(id, name)| view! {
                                                <a class="link" href="#" on:click=move |ev| {
                                                    ev.prevent_default();
                                                    on_open.run(id.clone());
                                                }>{name}</a>
                                                " "
                                            })
                                            .collect_view()}
                                    </TableCell>
                                </TableRow>
                            }
                        }
                    />
                </TableBody>
            </Table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerDto;

    fn customer(name: &str, blacklisted: bool) -> Customer {
        Customer::new_for_insert(&CustomerDto {
            description: name.to_string(),
            phone: "+7 900 000-00-00".into(),
            national_id: "4510 123456".into(),
            driver_license: "77AB000001".into(),
            is_blacklisted: blacklisted,
            blacklist_reason: blacklisted.then(|| "Долг".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn blacklist_filter() {
        let ok = customer("Иванов", false);
        let banned = customer("Петров", true);
        assert!(matches_blacklist_filter(&ok, ""));
        assert!(matches_blacklist_filter(&banned, ""));
        assert!(matches_blacklist_filter(&ok, "active"));
        assert!(!matches_blacklist_filter(&banned, "active"));
        assert!(matches_blacklist_filter(&banned, "blacklisted"));
    }

    #[test]
    fn csv_row_matches_headers() {
        let c = customer("Сидоров", true);
        let row = c.to_csv_row();
        assert_eq!(row.len(), Customer::headers().len());
        assert_eq!(row[1], "Сидоров");
        assert_eq!(row[7], "Да");
        assert_eq!(row[8], "Долг");
    }

    #[test]
    fn sorts_by_name_case_insensitive() {
        let mut list = vec![customer("яковлев", false), customer("Абрамов", false)];
        sort_list(&mut list, "name", true);
        assert_eq!(list[0].full_name(), "Абрамов");
    }
}
