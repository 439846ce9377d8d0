use chrono::Datelike;
use contracts::dashboards::d402_tax_summary::{TaxRow, TaxSummaryResponse};
use contracts::domain::common::today;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d402_tax_summary::api;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::stat_card::{format_money, StatCard};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::month_title;
use crate::shared::export::{csv_number, export_to_excel, print_page, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

impl ExcelExportable for TaxRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "Период",
            "Доходы",
            "Расходы к вычету",
            "Прочие расходы",
            "Налоговая база",
            "НДС",
            "Налог на прибыль",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            period_label(&self.period),
            csv_number(self.income),
            csv_number(self.deductible_expenses),
            csv_number(self.other_expenses),
            csv_number(self.taxable_income),
            csv_number(self.vat_due),
            csv_number(self.income_tax),
        ]
    }
}

pub fn period_label(period: &str) -> String {
    if period == "total" {
        "Итого".to_string()
    } else {
        month_title(period)
    }
}

/// Значение селектора квартала: "" весь год, "1".."4"
pub fn parse_quarter(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|q| (1..=4).contains(q))
}

pub fn tax_total(row: &TaxRow) -> f64 {
    row.vat_due + row.income_tax
}

/// Годы для выбора: текущий и четыре предыдущих
pub fn year_options(current: i32) -> Vec<i32> {
    (0..5).map(|i| current - i).collect()
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

#[component]
fn TaxRowView(row: TaxRow, #[prop(optional)] total: bool) -> impl IntoView {
    let style = if total { "font-weight: 600;" } else { "" };
    view! {
        <TableRow attr:style=style>
            <TableCell><TableCellLayout>{period_label(&row.period)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.income)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.deductible_expenses)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.other_expenses)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.taxable_income)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.vat_due)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_money(row.income_tax)}</TableCellLayout></TableCell>
        </TableRow>
    }
}

#[component]
pub fn TaxSummaryDashboard() -> impl IntoView {
    let toasts = use_toasts();
    let current_year = today().year();
    let year = RwSignal::new(current_year.to_string());
    let quarter = RwSignal::new(String::new());
    let data: RwSignal<Option<TaxSummaryResponse>> = RwSignal::new(None);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let Ok(y) = year.get().parse::<i32>() else {
            return;
        };
        let q = parse_quarter(&quarter.get());
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::get_tax_summary(y, q).await {
                Ok(response) => data.set(Some(response)),
                Err(e) => {
                    log::error!("d402 tax summary {} {:?}: {}", y, q, e);
                    data.set(None);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let total = move || data.with(|d| d.as_ref().map(|d| d.total.clone()));
    let rows = move || data.with(|d| d.as_ref().map(|d| d.rows.clone()).unwrap_or_default());
    let rates_text = move || {
        data.with(|d| {
            d.as_ref().map(|d| {
                format!(
                    "НДС {} (в т.ч.), налог на прибыль {}",
                    percent(d.rates.vat_rate),
                    percent(d.rates.income_tax_rate)
                )
            })
        })
    };

    let export = move |_| {
        let mut all = rows();
        if let Some(t) = total() {
            all.push(t);
        }
        let filename = format!("tax_{}_{}.csv", year.get_untracked(), quarter.get_untracked());
        if let Err(e) = export_to_excel(&all, &filename) {
            toasts.warning(e);
        }
    };
    let print = move |_| {
        if let Err(e) = print_page() {
            toasts.warning(e);
        }
    };

    view! {
        <PageFrame page_id="d402_tax_summary--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Налоговая сводка"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " Excel"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=print>
                        {icon("printer")}
                        " Печать"
                    </Button>
                </div>
            </div>

            <div class="filter-panel">
                <div class="filter-panel-content">
                    <Flex gap=FlexGap::Small align=FlexAlign::Center>
                        <div style="width: 120px;">
                            <Label>"Год"</Label>
                            <Select value=year>
                                {year_options(current_year)
                                    .into_iter()
                                    .map(|y| view! { <option value=y.to_string()>{y}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <div style="width: 160px;">
                            <Label>"Период"</Label>
                            <Select value=quarter>
                                <option value="">"Весь год"</option>
                                <option value="1">"I квартал"</option>
                                <option value="2">"II квартал"</option>
                                <option value="3">"III квартал"</option>
                                <option value="4">"IV квартал"</option>
                            </Select>
                        </div>
                        {move || loading.get().then(|| view! { <Spinner size=SpinnerSize::Small /> })}
                    </Flex>
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="page__content">
                <div class="indicator-set__grid indicator-set__grid--cols-4">
                    <StatCard
                        label="Доходы"
                        icon_name="trending-up"
                        value=Signal::derive(move || total().map(|t| t.income))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Neutral
                    />
                    <StatCard
                        label="Налоговая база"
                        icon_name="receipt"
                        value=Signal::derive(move || total().map(|t| t.taxable_income))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Neutral
                        subtitle=Signal::derive(move || {
                            total().map(|t| format!("Вычеты: {}", format_money(t.deductible_expenses)))
                        })
                    />
                    <StatCard
                        label="НДС к уплате"
                        icon_name="percent"
                        value=Signal::derive(move || total().map(|t| t.vat_due))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Warning
                    />
                    <StatCard
                        label="Налог на прибыль"
                        icon_name="wallet"
                        value=Signal::derive(move || total().map(|t| t.income_tax))
                        format=ValueFormat::rub()
                        status=IndicatorStatus::Warning
                        subtitle=Signal::derive(move || {
                            total().map(|t| format!("Всего налогов: {}", format_money(tax_total(&t))))
                        })
                    />
                </div>

                <CardAnimated delay_ms=80 title="Помесячно">
                    <div class="text--muted" style="margin-bottom: 8px;">{rates_text}</div>
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=140.0>"Период"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Доходы"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"К вычету"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Прочие"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"База"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"НДС"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Налог"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=rows
                                key=|r| r.period.clone()
                                children=move |row| view! { <TaxRowView row=row /> }
                            />
                            {move || total().map(|t| view! { <TaxRowView row=t total=true /> })}
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

    #[test]
    fn period_labels() {
        assert_eq!(period_label("total"), "Итого");
        assert_eq!(period_label("2025-03"), "Март 2025");
    }

    #[test]
    fn quarter_parsing() {
        assert_eq!(parse_quarter(""), None);
        assert_eq!(parse_quarter("2"), Some(2));
        assert_eq!(parse_quarter("5"), None);
    }

    #[test]
    fn years_go_backwards() {
        assert_eq!(year_options(2026), vec![2026, 2025, 2024, 2023, 2022]);
    }

    #[test]
    fn csv_row_for_total() {
        let row = TaxRow {
            period: "total".into(),
            income: 1200.0,
            vat_due: 200.0,
            income_tax: 100.5,
            ..TaxRow::default()
        };
        let csv = row.to_csv_row();
        assert_eq!(csv[0], "Итого");
        assert_eq!(csv[1], "1200,00");
        assert_eq!(csv.len(), TaxRow::headers().len());
        assert_eq!(tax_total(&row), 300.5);
    }
}
