use contracts::dashboards::d400_fleet_analytics::{FleetAnalyticsResponse, VehicleProfitability};
use contracts::domain::common::today;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use contracts::shared::metrics::TrendDirection;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d400_fleet_analytics::api;
use crate::domain::a002_vehicle::ui::list::status_class;
use crate::shared::components::bar_chart::{BarChart, BarPoint};
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::{month_range_input, DateRangePicker};
use crate::shared::components::stat_card::{format_money, StatCard};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::month_short;
use crate::shared::export::{csv_number, export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{cmp_f64, cmp_text, get_sort_indicator, sort_list, toggle_sort, Sortable};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

impl Sortable for VehicleProfitability {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "plate" => cmp_text(&self.plate_number, &other.plate_number),
            "revenue" => cmp_f64(self.revenue, other.revenue),
            "maintenance" => cmp_f64(self.maintenance_cost, other.maintenance_cost),
            "profit" => cmp_f64(self.profit, other.profit),
            "utilization" => cmp_f64(self.utilization, other.utilization),
            "roi" => cmp_f64(self.roi, other.roi),
            _ => cmp_f64(self.profitability_score, other.profitability_score),
        }
    }
}

impl ExcelExportable for VehicleProfitability {
    fn headers() -> Vec<&'static str> {
        vec![
            "Госномер",
            "Автомобиль",
            "Выручка",
            "Обслуживание",
            "Прибыль",
            "Дней в аренде",
            "Загрузка, %",
            "ROI, %",
            "Оценка",
            "Тренд",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.plate_number.clone(),
            self.name.clone(),
            csv_number(self.revenue),
            csv_number(self.maintenance_cost),
            csv_number(self.profit),
            self.rented_days.to_string(),
            csv_number(self.utilization * 100.0),
            csv_number(self.roi * 100.0),
            csv_number(self.profitability_score),
            trend_label(self.trend.direction).to_string(),
        ]
    }
}

pub fn trend_label(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "Рост",
        TrendDirection::Down => "Спад",
        TrendDirection::Stable => "Стабильно",
    }
}

/// Цвет оценки доходности: от 60 хорошо, ниже 30 плохо
pub fn score_status(score: f64) -> IndicatorStatus {
    if score >= 60.0 {
        IndicatorStatus::Good
    } else if score < 30.0 {
        IndicatorStatus::Bad
    } else {
        IndicatorStatus::Warning
    }
}

fn score_class(score: f64) -> &'static str {
    match score_status(score) {
        IndicatorStatus::Good => "badge badge--success",
        IndicatorStatus::Bad => "badge badge--error",
        _ => "badge badge--warning",
    }
}

/// Прибыль по автомобилям для графика, лучшие сначала
pub fn profit_points(data: &FleetAnalyticsResponse, limit: usize) -> Vec<BarPoint> {
    let mut rows: Vec<&VehicleProfitability> = data.vehicles.iter().collect();
    rows.sort_by(|a, b| cmp_f64(b.profit, a.profit));
    rows.into_iter()
        .take(limit)
        .map(|v| BarPoint::new(v.plate_number.clone(), v.profit))
        .collect()
}

/// Суммарные дни аренды автопарка по месяцам
pub fn usage_points(data: &FleetAnalyticsResponse) -> Vec<BarPoint> {
    data.month_labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let days: f64 = data
                .vehicles
                .iter()
                .filter_map(|v| v.monthly_usage.get(i))
                .sum();
            BarPoint::new(month_short(label), days)
        })
        .collect()
}

fn format_compact(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

#[component]
pub fn FleetAnalyticsDashboard() -> impl IntoView {
    let toasts = use_toasts();
    let (month_from, month_to) = month_range_input(today(), 0);
    let date_from = RwSignal::new(month_from);
    let date_to = RwSignal::new(month_to);
    let data: RwSignal<Option<FleetAnalyticsResponse>> = RwSignal::new(None);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let reload = RwSignal::new(0u32);
    let sort_field = RwSignal::new("score".to_string());
    let sort_ascending = RwSignal::new(false);

    Effect::new(move |_| {
        let from = date_from.get();
        let to = date_to.get();
        reload.track();
        if from.is_empty() || to.is_empty() {
            return;
        }
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::get_fleet_analytics(&from, &to).await {
                Ok(response) => data.set(Some(response)),
                Err(e) => {
                    log::error!("d400 fleet analytics: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let rows = Signal::derive(move || {
        let mut list = data.with(|d| d.as_ref().map(|d| d.vehicles.clone()).unwrap_or_default());
        sort_list(&mut list, &sort_field.get(), sort_ascending.get());
        list
    });
    let totals = move || data.with(|d| d.as_ref().map(|d| d.totals.clone()));
    let profit_chart = Signal::derive(move || {
        data.with(|d| d.as_ref().map(|d| profit_points(d, 12)).unwrap_or_default())
    });
    let usage_chart =
        Signal::derive(move || data.with(|d| d.as_ref().map(usage_points).unwrap_or_default()));

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

    let export = move |_| {
        if let Err(e) = export_to_excel(&rows.get_untracked(), "fleet_analytics.csv") {
            toasts.warning(e);
        }
    };

    view! {
        <PageFrame page_id="d400_fleet_analytics--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Доходность автопарка"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " Excel"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload.update(|n| *n += 1)
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            <div class="filter-panel">
                <div class="filter-panel-content">
                    <DateRangePicker date_from=date_from date_to=date_to label="Период" />
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="page__content">
                <div class="indicator-set__grid indicator-set__grid--cols-3">
                    <StatCard
                        label="Выручка"
                        icon_name="trending-up"
                        value=Signal::derive(move || totals().map(|t| t.revenue))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Neutral
                        subtitle=Signal::derive(move || totals().map(|t| format!("Автомобилей: {}", t.vehicles)))
                    />
                    <StatCard
                        label="Обслуживание"
                        icon_name="wrench"
                        value=Signal::derive(move || totals().map(|t| t.maintenance_cost))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Neutral
                    />
                    <StatCard
                        label="Прибыль"
                        icon_name="wallet"
                        value=Signal::derive(move || totals().map(|t| t.profit))
                        format=ValueFormat::rub()
                        status=Signal::derive(move || match totals() {
                            Some(t) if t.profit < 0.0 => IndicatorStatus::Bad,
                            Some(_) => IndicatorStatus::Good,
                            None => IndicatorStatus::Neutral,
                        })
                    />
                    <StatCard
                        label="Средняя загрузка"
                        icon_name="activity"
                        value=Signal::derive(move || totals().map(|t| t.average_utilization * 100.0))
                        format=ValueFormat::Percent { decimals: 1 }
                        status=IndicatorStatus::Neutral
                    />
                    <StatCard
                        label="Средняя оценка"
                        icon_name="bar-chart"
                        value=Signal::derive(move || totals().map(|t| t.average_score))
                        format=ValueFormat::Number { decimals: 0 }
                        status=Signal::derive(move || {
                            totals().map(|t| score_status(t.average_score)).unwrap_or(IndicatorStatus::Neutral)
                        })
                    />
                </div>

                <CardAnimated delay_ms=0 title="Прибыль по автомобилям">
                    <BarChart title="Прибыль, ₽" points=profit_chart format=format_compact />
                </CardAnimated>
                <CardAnimated delay_ms=80 title="Дни аренды по месяцам">
                    <BarChart title="Дней в аренде" points=usage_chart />
                </CardAnimated>

                <CardAnimated delay_ms=160 title="Автомобили">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=110.0>
                                    <div class="table__sortable-header" on:click=on_sort("plate")>
                                        "Автомобиль"
                                        <span class="table__header-sort-indicator">{indicator("plate")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Статус"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>
                                    <div class="table__sortable-header" on:click=on_sort("revenue")>
                                        "Выручка"
                                        <span class="table__header-sort-indicator">{indicator("revenue")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=110.0>
                                    <div class="table__sortable-header" on:click=on_sort("maintenance")>
                                        "ТО"
                                        <span class="table__header-sort-indicator">{indicator("maintenance")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=110.0>
                                    <div class="table__sortable-header" on:click=on_sort("profit")>
                                        "Прибыль"
                                        <span class="table__header-sort-indicator">{indicator("profit")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=90.0>
                                    <div class="table__sortable-header" on:click=on_sort("utilization")>
                                        "Загрузка"
                                        <span class="table__header-sort-indicator">{indicator("utilization")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=80.0>
                                    <div class="table__sortable-header" on:click=on_sort("roi")>
                                        "ROI"
                                        <span class="table__header-sort-indicator">{indicator("roi")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=80.0>
                                    <div class="table__sortable-header" on:click=on_sort("score")>
                                        "Оценка"
                                        <span class="table__header-sort-indicator">{indicator("score")}</span>
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell min_width=120.0>"Тренд"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|v| v.vehicle_id.clone()
                                children=move |v| {
                                    let loss = v.profit < 0.0;
                                    let trend = format!(
                                        "{} {}",
                                        v.trend.direction.arrow(),
                                        v.trend
                                            .change_percent
                                            .map(|p| format!("{:+.0}%", p))
                                            .unwrap_or_else(|| trend_label(v.trend.direction).to_string())
                                    );
                                    let seasonal = v.seasonal.filter(|s| s.is_seasonal).map(|s| {
                                        format!("сезонность ×{:.1}", s.seasonality_index)
                                    });
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{v.plate_number.clone()}</span>
                                                    " "
                                                    <span class="text--muted">{v.name.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class=status_class(v.status)>{v.status.label()}</span>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_money(v.revenue)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_money(v.maintenance_cost)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class:text--error=loss>{format_money(v.profit)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format!("{:.0}%", v.utilization * 100.0)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format!("{:.0}%", v.roi * 100.0)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class=score_class(v.profitability_score)>
                                                    {format!("{:.0}", v.profitability_score)}
                                                </span>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {trend}
                                                    {seasonal.map(|s| view! { <div class="text--muted">{s}</div> })}
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </CardAnimated>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::dashboards::d400_fleet_analytics::FleetTotals;
    use contracts::domain::a002_vehicle::VehicleStatus;
    use contracts::shared::metrics::UsageTrend;

    fn row(plate: &str, profit: f64, usage: Vec<f64>) -> VehicleProfitability {
        VehicleProfitability {
            vehicle_id: plate.to_lowercase(),
            plate_number: plate.into(),
            name: "Kia Rio".into(),
            status: VehicleStatus::Available,
            revenue: profit + 1000.0,
            maintenance_cost: 1000.0,
            profit,
            rented_days: 10,
            utilization: 0.33,
            margin: 0.5,
            roi: 0.1,
            profitability_score: 45.0,
            monthly_usage: usage,
            trend: UsageTrend {
                early_average: 5.0,
                recent_average: 5.0,
                change_percent: Some(0.0),
                direction: TrendDirection::Stable,
            },
            seasonal: None,
        }
    }

    fn response(vehicles: Vec<VehicleProfitability>) -> FleetAnalyticsResponse {
        FleetAnalyticsResponse {
            date_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            month_labels: vec!["2025-12".into(), "2026-01".into()],
            vehicles,
            totals: FleetTotals::default(),
        }
    }

    #[test]
    fn profit_chart_is_sorted_and_limited() {
        let data = response(vec![
            row("A1", 100.0, vec![]),
            row("B2", 900.0, vec![]),
            row("C3", -50.0, vec![]),
        ]);
        let points = profit_points(&data, 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], BarPoint::new("B2", 900.0));
        assert_eq!(points[1].label, "A1");
    }

    #[test]
    fn usage_is_summed_per_month() {
        let data = response(vec![row("A1", 0.0, vec![3.0, 10.0]), row("B2", 0.0, vec![4.0])]);
        let points = usage_points(&data);
        assert_eq!(points, vec![BarPoint::new("12.25", 7.0), BarPoint::new("01.26", 10.0)]);
    }

    #[test]
    fn score_thresholds() {
        assert_eq!(score_status(75.0), IndicatorStatus::Good);
        assert_eq!(score_status(60.0), IndicatorStatus::Good);
        assert_eq!(score_status(45.0), IndicatorStatus::Warning);
        assert_eq!(score_status(10.0), IndicatorStatus::Bad);
    }

    #[test]
    fn csv_row_matches_headers() {
        let r = row("A1", 2500.0, vec![]);
        let csv = r.to_csv_row();
        assert_eq!(csv.len(), VehicleProfitability::headers().len());
        assert_eq!(csv[6], "33,00");
        assert_eq!(csv[9], "Стабильно");
    }
}
