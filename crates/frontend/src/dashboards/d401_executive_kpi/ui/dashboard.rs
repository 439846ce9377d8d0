use contracts::dashboards::d401_executive_kpi::{shift_month, ExecutiveKpiResponse, MonthValue};
use contracts::domain::common::today;
use contracts::shared::indicators::KpiValue;
use chrono::Datelike;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d401_executive_kpi::api;
use crate::shared::components::bar_chart::{BarChart, BarPoint};
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::stat_card::StatCard;
use crate::shared::date_utils::{month_short, month_title};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

/// Выручка за 12 месяцев для графика
pub fn revenue_points(series: &[MonthValue]) -> Vec<BarPoint> {
    series
        .iter()
        .map(|m| BarPoint::new(month_short(&m.period), m.value))
        .collect()
}

/// Нельзя уйти в будущее дальше текущего месяца
pub fn can_go_forward(year: i32, month: u32, current: (i32, u32)) -> bool {
    (year, month) < current
}

fn kpi_card(kpi: KpiValue) -> impl IntoView {
    view! {
        <StatCard
            label=kpi.label
            icon_name=kpi.icon
            value=kpi.value
            format=kpi.format
            status=kpi.status
            change_percent=kpi.change_percent
            subtitle=kpi.subtitle
        />
    }
}

#[component]
pub fn ExecutiveKpiDashboard() -> impl IntoView {
    let now = today();
    let current = (now.year(), now.month());
    let year = RwSignal::new(now.year());
    let month = RwSignal::new(now.month());
    let data: RwSignal<Option<ExecutiveKpiResponse>> = RwSignal::new(None);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let reload = RwSignal::new(0u32);

    Effect::new(move |_| {
        let y = year.get();
        let m = month.get();
        reload.track();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::get_kpi(y, m).await {
                Ok(response) => data.set(Some(response)),
                Err(e) => {
                    log::error!("d401 kpi {}-{:02}: {}", y, m, e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let shift = move |delta: i32| {
        let (y, m) = shift_month(year.get_untracked(), month.get_untracked(), delta);
        year.set(y);
        month.set(m);
    };
    let forward_disabled = Signal::derive(move || !can_go_forward(year.get(), month.get(), current));
    let period_title = move || month_title(&format!("{}-{:02}", year.get(), month.get()));

    let kpis = move || data.with(|d| d.as_ref().map(|d| d.kpis.clone()).unwrap_or_default());
    let revenue_chart = Signal::derive(move || {
        data.with(|d| d.as_ref().map(|d| revenue_points(&d.revenue_by_month)).unwrap_or_default())
    });

    view! {
        <PageFrame page_id="d401_executive_kpi--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Ключевые показатели"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| shift(-1)>
                        {icon("chevron-left")}
                    </Button>
                    <span class="page__period">{period_title}</span>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| shift(1)
                        disabled=forward_disabled
                    >
                        {icon("chevron-right")}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            year.set(current.0);
                            month.set(current.1);
                        }
                    >
                        "Текущий месяц"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload.update(|n| *n += 1)
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="page__content">
                <Show
                    when=move || data.with(|d| d.is_some())
                    fallback=move || view! {
                        <Flex gap=FlexGap::Small style="align-items: center; padding: 20px;">
                            <Spinner />
                            "Загрузка показателей..."
                        </Flex>
                    }
                >
                    <div class="indicator-set__grid indicator-set__grid--cols-3">
                        <For each=kpis key=|k| k.id.clone() children=kpi_card />
                    </div>
                </Show>

                <CardAnimated delay_ms=100 title="Выручка за 12 месяцев">
                    <BarChart title="Выручка, ₽" points=revenue_chart />
                </CardAnimated>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_points_use_short_labels() {
        let series = vec![
            MonthValue { period: "2025-11".into(), value: 1000.0 },
            MonthValue { period: "2025-12".into(), value: 2500.5 },
        ];
        assert_eq!(
            revenue_points(&series),
            vec![BarPoint::new("11.25", 1000.0), BarPoint::new("12.25", 2500.5)]
        );
    }

    #[test]
    fn forward_navigation_stops_at_current_month() {
        assert!(can_go_forward(2026, 9, (2026, 10)));
        assert!(can_go_forward(2025, 12, (2026, 1)));
        assert!(!can_go_forward(2026, 10, (2026, 10)));
    }
}
