use std::collections::HashMap;

use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a006_maintenance::{MaintenanceKind, MaintenanceRecord};
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_vehicle::api as vehicle_api;
use crate::domain::a002_vehicle::COLLECTION as VEHICLE_COLLECTION;
use crate::domain::a006_maintenance::ui::details::MaintenanceDetails;
use crate::domain::a006_maintenance::{api, COLLECTION};
use crate::domain::a007_ledger_entry::COLLECTION as LEDGER_COLLECTION;
use crate::layout::global_context::use_app_context;
use crate::shared::components::stat_card::{format_money, format_thousands};
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

/// Запись журнала с госномером для таблицы и выгрузки
#[derive(Debug, Clone)]
pub struct MaintenanceRow {
    pub record: MaintenanceRecord,
    pub plate_number: String,
}

impl Sortable for MaintenanceRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        let (a, b) = (&self.record, &other.record);
        match field {
            "code" => cmp_text(&a.base.code, &b.base.code),
            "vehicle" => cmp_text(&self.plate_number, &other.plate_number),
            "kind" => cmp_text(a.kind.label(), b.kind.label()),
            "description" => cmp_text(&a.base.description, &b.base.description),
            "cost" => cmp_f64(a.cost, b.cost),
            "mileage" => a.mileage.cmp(&b.mileage),
            _ => a.service_date.cmp(&b.service_date),
        }
    }
}

impl ExcelExportable for MaintenanceRow {
    fn headers() -> Vec<&'static str> {
        vec!["Номер", "Дата", "Автомобиль", "Вид работ", "Описание", "Стоимость", "Пробег", "Исполнитель"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        let r = &self.record;
        vec![
            r.base.code.clone(),
            format_naive(&r.service_date),
            self.plate_number.clone(),
            r.kind.label().to_string(),
            r.base.description.clone(),
            csv_number(r.cost),
            r.mileage.to_string(),
            r.vendor.clone().unwrap_or_default(),
        ]
    }
}

/// Подставить госномера; неизвестный автомобиль показываем как "-"
pub fn with_plates(records: Vec<MaintenanceRecord>, vehicles: &[Vehicle]) -> Vec<MaintenanceRow> {
    let plates: HashMap<String, String> = vehicles
        .iter()
        .map(|v| (v.to_string_id(), v.plate_number().to_string()))
        .collect();
    records
        .into_iter()
        .map(|record| {
            let plate_number = plates
                .get(&record.vehicle_id.as_string())
                .cloned()
                .unwrap_or_else(|| "-".to_string());
            MaintenanceRow { record, plate_number }
        })
        .collect()
}

pub fn cost_total(rows: &[MaintenanceRow]) -> f64 {
    rows.iter().map(|r| r.record.cost).sum()
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn MaintenanceList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let records: RwSignal<Vec<MaintenanceRecord>> = RwSignal::new(Vec::new());
    let vehicles: RwSignal<Vec<Vehicle>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let vehicle_filter = RwSignal::new(String::new());
    let kind_filter = RwSignal::new(String::new());
    let sort_field = RwSignal::new("date".to_string());
    let sort_ascending = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    Effect::new(move |_| {
        ctx.revision(VEHICLE_COLLECTION);
        spawn_local(async move {
            match vehicle_api::fetch_all_vehicles().await {
                Ok(list) => vehicles.set(list),
                Err(e) => log::warn!("vehicles for maintenance list: {}", e),
            }
        });
    });

    let load_data = move || {
        let vehicle_id = vehicle_filter.get_untracked();
        let query = search.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_records(&vehicle_id, &query).await {
                Ok(page) => {
                    total.set(page.total);
                    records.set(page.items);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить журнал: {}", e))),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        search.track();
        vehicle_filter.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let vehicle_options = Signal::derive(move || {
        vehicles.with(|list| {
            let mut options: Vec<(String, String)> = list
                .iter()
                .map(|v| (v.to_string_id(), v.plate_number().to_string()))
                .collect();
            options.sort_by(|a, b| a.1.cmp(&b.1));
            options
        })
    });

    let visible = Signal::derive(move || {
        let kind = kind_filter.get();
        let filtered: Vec<MaintenanceRecord> = records
            .get()
            .into_iter()
            .filter(|r| kind.is_empty() || r.kind.as_str() == kind)
            .collect();
        let mut rows = vehicles.with(|list| with_plates(filtered, list));
        sort_list(&mut rows, &sort_field.get(), sort_ascending.get());
        rows
    });
    let visible_cost = Signal::derive(move || visible.with(|rows| cost_total(rows)));

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
        let preset_vehicle = Some(vehicle_filter.get_untracked()).filter(|v| !v.is_empty());
        modal_stack.push_with_frame(Some(DETAIL_FRAME.to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <MaintenanceDetails
                    id=id.clone()
                    vehicle_id=preset_vehicle.clone().unwrap_or_default()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Запись сохранена");
                        ctx.bump(COLLECTION);
                        // расход попадает в журнал операций
                        ctx.bump(LEDGER_COLLECTION);
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
                if let Err(e) = api::delete_record(id).await {
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
            ctx.bump(LEDGER_COLLECTION);
        });
    };

    let export_visible = move |_| {
        if let Err(e) = export_to_excel(&visible.get_untracked(), "maintenance.csv") {
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
            selection.set_all(
                visible
                    .get_untracked()
                    .iter()
                    .map(|r| r.record.to_string_id())
                    .collect(),
            );
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a006_maintenance--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Обслуживание"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || format!("{} / {}", visible.with(|v| v.len()), total.get())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " Новая запись"
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
                            <Input value=search placeholder="Описание, исполнитель...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 190px;">
                            <select
                                class="form__select"
                                prop:value=move || vehicle_filter.get()
                                on:change=move |ev| vehicle_filter.set(event_target_value(&ev))
                            >
                                <option value="">"Все автомобили"</option>
                                <For
                                    each=move || vehicle_options.get()
                                    key=|(id, _)| id.clone()
                                    children=move |(id, plate)| {
                                        let value = id.clone();
                                        view! {
                                            <option value=value prop:selected=move || vehicle_filter.get() == id>{plate}</option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                        <div style="width: 170px;">
                            <Select value=kind_filter>
                                <option value="">"Все виды"</option>
                                {MaintenanceKind::ALL
                                    .iter()
                                    .map(|k| view! { <option value=k.as_str()>{k.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                    </Flex>
                </div>
            </div>

            <div class="table-summary">
                <span>"Затраты: " <strong>{move || format_money(visible_cost.get())}</strong></span>
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
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("vehicle")>
                                    "Автомобиль"
                                    <span class="table__header-sort-indicator">{indicator("vehicle")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("kind")>
                                    "Вид"
                                    <span class="table__header-sort-indicator">{indicator("kind")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=200.0>
                                <div class="table__sortable-header" on:click=on_sort("description")>
                                    "Описание"
                                    <span class="table__header-sort-indicator">{indicator("description")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("cost")>
                                    "Стоимость"
                                    <span class="table__header-sort-indicator">{indicator("cost")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=100.0>
                                <div class="table__sortable-header" on:click=on_sort("mileage")>
                                    "Пробег"
                                    <span class="table__header-sort-indicator">{indicator("mileage")}</span>
                                </div>
                            </TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|r| (r.record.to_string_id(), r.record.base.metadata.version, r.plate_number.clone())
                            children=move |row| {
                                let record = row.record;
                                let id = record.to_string_id();
                                let id_for_open = id.clone();
                                view! {
                                    <TableRow on:click=move |_| open_details(Some(id_for_open.clone()))>
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>{record.base.code.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_naive(&record.service_date)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span style="font-weight: 500;">{row.plate_number}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{record.kind.label()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{record.base.description.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_money(record.cost)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_thousands(record.mileage)}</TableCellLayout>
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
    use contracts::domain::a002_vehicle::{VehicleCategory, VehicleDto};
    use contracts::domain::a006_maintenance::MaintenanceDto;

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::new_for_insert(&VehicleDto {
            plate_number: plate.into(),
            make: "Skoda".into(),
            model: "Octavia".into(),
            year: 2021,
            category: VehicleCategory::Midsize,
            daily_rate: 3000.0,
            ..Default::default()
        })
    }

    fn record(vehicle: &Vehicle, cost: f64) -> MaintenanceRecord {
        MaintenanceRecord::new_for_insert(
            vehicle.base.id,
            &MaintenanceDto {
                service_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
                kind: MaintenanceKind::Repair,
                cost,
                mileage: 41_000,
                ..Default::default()
            },
        )
    }

    #[test]
    fn plates_are_resolved_from_vehicle_list() {
        let known = vehicle("B200BB77");
        let unknown = vehicle("C300CC77");
        let rows = with_plates(vec![record(&known, 1.0), record(&unknown, 2.0)], &[known.clone()]);
        assert_eq!(rows[0].plate_number, "B200BB77");
        assert_eq!(rows[1].plate_number, "-");
        assert_eq!(cost_total(&rows), 3.0);
    }

    #[test]
    fn csv_row_matches_headers() {
        let v = vehicle("B200BB77");
        let rows = with_plates(vec![record(&v, 12_500.0)], &[v.clone()]);
        let csv = rows[0].to_csv_row();
        assert_eq!(csv.len(), MaintenanceRow::headers().len());
        assert_eq!(csv[1], "02.04.2026");
        assert_eq!(csv[3], "Ремонт");
        assert_eq!(csv[5], "12500,00");
    }
}
