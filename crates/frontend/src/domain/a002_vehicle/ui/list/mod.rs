use contracts::domain::a002_vehicle::{Vehicle, VehicleCategory, VehicleStatus};
use contracts::domain::common::today;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_vehicle::ui::details::VehicleDetails;
use crate::domain::a002_vehicle::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::shared::components::date_input::{month_range_input, DateRangePicker};
use crate::shared::components::stat_card::{format_money, format_thousands};
use crate::shared::components::table_checkbox::{Selection, TableCheckbox, TableHeaderCheckbox};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::{format_opt_date, parse_input};
use crate::shared::export::{csv_number, download_server_export, export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_f64, cmp_text, confirm_with_message, get_sort_indicator, records_label, sort_list,
    toggle_sort, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

/// До ТО осталось меньше этого пробега: подсветка в списке
pub const SERVICE_WARNING_KM: i64 = 1000;

impl Sortable for Vehicle {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "name" => cmp_text(&self.base.description, &other.base.description),
            "year" => self.year.cmp(&other.year),
            "category" => cmp_text(self.category.label(), other.category.label()),
            "status" => cmp_text(self.status.label(), other.status.label()),
            "daily_rate" => cmp_f64(self.daily_rate, other.daily_rate),
            "mileage" => self.mileage.cmp(&other.mileage),
            "km_to_service" => self.km_to_service().cmp(&other.km_to_service()),
            _ => cmp_text(self.plate_number(), other.plate_number()),
        }
    }
}

impl ExcelExportable for Vehicle {
    fn headers() -> Vec<&'static str> {
        vec![
            "Госномер",
            "Автомобиль",
            "Год",
            "Класс",
            "Статус",
            "Тариф",
            "Пробег",
            "До ТО, км",
            "Страховка до",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.plate_number().to_string(),
            self.base.description.clone(),
            self.year.to_string(),
            self.category.label().to_string(),
            self.status.label().to_string(),
            csv_number(self.daily_rate),
            self.mileage.to_string(),
            self.km_to_service().map(|km| km.to_string()).unwrap_or_default(),
            format_opt_date(&self.insurance_expiry),
        ]
    }
}

/// Фильтр по статусу и классу; пустое значение означает "любой"
pub fn matches_filters(vehicle: &Vehicle, status: &str, category: &str) -> bool {
    (status.is_empty() || vehicle.status.as_str() == status)
        && (category.is_empty() || vehicle.category.as_str() == category)
}

pub fn status_class(status: VehicleStatus) -> &'static str {
    match status {
        VehicleStatus::Available => "badge badge--success",
        VehicleStatus::Rented => "badge badge--info",
        VehicleStatus::Maintenance => "badge badge--warning",
        VehicleStatus::OutOfService => "badge badge--neutral",
    }
}

/// ТО просрочено или скоро
pub fn service_due(vehicle: &Vehicle) -> bool {
    vehicle
        .km_to_service()
        .map(|km| km <= SERVICE_WARNING_KM)
        .unwrap_or(false)
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn VehicleList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<Vehicle>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let status_filter = RwSignal::new(String::new());
    let category_filter = RwSignal::new(String::new());
    let available_only = RwSignal::new(false);
    let (month_from, month_to) = month_range_input(today(), 0);
    let date_from = RwSignal::new(month_from);
    let date_to = RwSignal::new(month_to);
    let sort_field = RwSignal::new("plate".to_string());
    let sort_ascending = RwSignal::new(true);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let query = search.get_untracked();
        let period = if available_only.get_untracked() {
            match (
                parse_input(&date_from.get_untracked()),
                parse_input(&date_to.get_untracked()),
            ) {
                (Ok(Some(from)), Ok(Some(to))) => Some((from, to)),
                _ => {
                    error.set(Some("Укажите период для подбора свободных автомобилей".into()));
                    return;
                }
            }
        } else {
            None
        };
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let result = match period {
                Some((from, to)) => api::fetch_available(from, to).await.map(|list| {
                    let total = list.len() as u64;
                    (list, total)
                }),
                None => api::fetch_vehicles(&query).await.map(|page| (page.items, page.total)),
            };
            match result {
                Ok((list, count)) => {
                    total.set(count);
                    items.set(list);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить автомобили: {}", e))),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        search.track();
        available_only.track();
        date_from.track();
        date_to.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let visible = Signal::derive(move || {
        let status = status_filter.get();
        let category = category_filter.get();
        let mut data: Vec<Vehicle> = items
            .get()
            .into_iter()
            .filter(|v| matches_filters(v, &status, &category))
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
                <VehicleDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Автомобиль сохранён");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let open_status = move |vehicle: Vehicle| {
        modal_stack.push_with_frame(Some("width: 420px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <StatusForm
                    vehicle=vehicle.clone()
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
                if let Err(e) = api::delete_vehicle(id).await {
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
        if let Err(e) = export_to_excel(&visible.get_untracked(), "vehicles.csv") {
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
            selection.set_all(visible.get_untracked().iter().map(|v| v.to_string_id()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a002_vehicle--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Автопарк"</h1>
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
                    <Flex gap=FlexGap::Small align=FlexAlign::End style="flex-wrap: wrap;">
                        <div style="flex: 1; max-width: 300px;">
                            <Input value=search placeholder="Госномер, марка, VIN...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 190px;">
                            <Select value=status_filter>
                                <option value="">"Все статусы"</option>
                                {VehicleStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <div style="width: 170px;">
                            <Select value=category_filter>
                                <option value="">"Все классы"</option>
                                {VehicleCategory::ALL
                                    .iter()
                                    .map(|c| view! { <option value=c.as_str()>{c.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <Checkbox checked=available_only label="Свободны в период" />
                        <Show when=move || available_only.get()>
                            <DateRangePicker date_from=date_from date_to=date_to />
                        </Show>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("plate")>
                                    "Госномер"
                                    <span class="table__header-sort-indicator">{indicator("plate")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=180.0>
                                <div class="table__sortable-header" on:click=on_sort("name")>
                                    "Автомобиль"
                                    <span class="table__header-sort-indicator">{indicator("name")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=70.0>
                                <div class="table__sortable-header" on:click=on_sort("year")>
                                    "Год"
                                    <span class="table__header-sort-indicator">{indicator("year")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("category")>
                                    "Класс"
                                    <span class="table__header-sort-indicator">{indicator("category")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=140.0>
                                <div class="table__sortable-header" on:click=on_sort("status")>
                                    "Статус"
                                    <span class="table__header-sort-indicator">{indicator("status")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("daily_rate")>
                                    "Тариф"
                                    <span class="table__header-sort-indicator">{indicator("daily_rate")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("mileage")>
                                    "Пробег"
                                    <span class="table__header-sort-indicator">{indicator("mileage")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("km_to_service")>
                                    "До ТО"
                                    <span class="table__header-sort-indicator">{indicator("km_to_service")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=60.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|v| (v.to_string_id(), v.base.metadata.version)
                            children=move |vehicle| {
                                let id = vehicle.to_string_id();
                                let id_for_open = id.clone();
                                let for_status = vehicle.clone();
                                let due = service_due(&vehicle);
                                let retired = vehicle.status == VehicleStatus::OutOfService;
                                let to_service = vehicle
                                    .km_to_service()
                                    .map(format_thousands)
                                    .unwrap_or_else(|| "-".to_string());
                                let plate = vehicle.plate_number().to_string();
                                let description = vehicle.base.description.clone();
                                let year = vehicle.year;
                                let category = vehicle.category.label();
                                let status = vehicle.status;
                                let daily_rate = format_money(vehicle.daily_rate);
                                let mileage = format_thousands(vehicle.mileage);
                                view! {
                                    <TableRow
                                        class:table__row--muted=retired
                                        on:click=move |_| open_details(Some(id_for_open.clone()))
                                    >
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>
                                                <span style="font-weight: 500;">{plate}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{description}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{year}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{category}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span class=status_class(status)>{status.label()}</span>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{daily_rate}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{mileage}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span class:text--error=due>{to_service}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <div on:click=|e| e.stop_propagation()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| open_status(for_status.clone())
                                                    attr:title="Сменить статус"
                                                >
                                                    {icon("activity")}
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

/// Ручная смена статуса. "В аренде" выставляется только договором
#[component]
fn StatusForm(vehicle: Vehicle, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let status = RwSignal::new(vehicle.status.as_str().to_string());
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let vehicle_id = StoredValue::new(vehicle.to_string_id());

    let on_save = move |_| {
        let parsed: VehicleStatus = match status.get_untracked().parse() {
            Ok(s) => s,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        saving.set(true);
        error.set(None);
        let id = vehicle_id.get_value();
        spawn_local(async move {
            match api::set_status(&id, parsed).await {
                Ok(()) => {
                    toasts.success(format!("Статус: {}", parsed.label()));
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{format!("Статус {}", vehicle.plate_number())}</h2>
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
            <div class="form__group">
                <Label>"Новый статус"</Label>
                <Select value=status>
                    {VehicleStatus::ALL
                        .iter()
                        .filter(|s| **s != VehicleStatus::Rented)
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </Select>
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
                "Применить"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_vehicle::VehicleDto;

    fn vehicle(plate: &str, status: VehicleStatus, category: VehicleCategory) -> Vehicle {
        Vehicle::new_for_insert(&VehicleDto {
            plate_number: plate.into(),
            make: "Kia".into(),
            model: "Rio".into(),
            year: 2022,
            category,
            status: Some(status),
            daily_rate: 2500.0,
            mileage: 30_000,
            ..Default::default()
        })
    }

    #[test]
    fn filters_by_status_and_category() {
        let v = vehicle("A001AA77", VehicleStatus::Available, VehicleCategory::Economy);
        assert!(matches_filters(&v, "", ""));
        assert!(matches_filters(&v, "Available", "Economy"));
        assert!(!matches_filters(&v, "Rented", ""));
        assert!(!matches_filters(&v, "", "Suv"));
    }

    #[test]
    fn service_warning_threshold() {
        let mut v = vehicle("A001AA77", VehicleStatus::Available, VehicleCategory::Economy);
        assert!(!service_due(&v));
        v.next_service_mileage = Some(30_500);
        assert!(service_due(&v));
        v.next_service_mileage = Some(45_000);
        assert!(!service_due(&v));
        v.next_service_mileage = Some(29_000);
        assert!(service_due(&v));
    }

    #[test]
    fn csv_row_matches_headers() {
        let v = vehicle("A001AA77", VehicleStatus::Maintenance, VehicleCategory::Suv);
        let row = v.to_csv_row();
        assert_eq!(row.len(), Vehicle::headers().len());
        assert_eq!(row[4], "На обслуживании");
        assert_eq!(row[5], "2500,00");
    }
}
