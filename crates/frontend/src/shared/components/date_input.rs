use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d401_executive_kpi::{month_bounds, shift_month};
use leptos::prelude::*;
use thaw::*;

/// Нативный date picker; значение в формате yyyy-mm-dd,
/// браузер показывает его в локали пользователя (dd.mm.yyyy для RU)
#[component]
pub fn DateInput(
    value: RwSignal<String>,
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="date-input"
            prop:value=move || value.get()
            prop:disabled=move || disabled.get()
            on:input=move |ev| value.set(event_target_value(&ev))
        />
    }
}

/// Границы месяца со сдвигом `delta` относительно месяца `today`, для полей ввода
pub fn month_range_input(today: NaiveDate, delta: i32) -> (String, String) {
    let (year, month) = shift_month(today.year(), today.month(), delta);
    match month_bounds(year, month) {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (String::new(), String::new()),
    }
}

/// Год целиком
pub fn year_range_input(year: i32) -> (String, String) {
    (format!("{:04}-01-01", year), format!("{:04}-12-31", year))
}

/// Период "с ... по ..." с кнопками быстрого выбора
#[component]
pub fn DateRangePicker(
    date_from: RwSignal<String>,
    date_to: RwSignal<String>,
    #[prop(optional, into)]
    label: String,
) -> impl IntoView {
    let set_range = move |(from, to): (String, String)| {
        date_from.set(from);
        date_to.set(to);
    };
    let today = move || chrono::Local::now().date_naive();

    view! {
        <Flex vertical=true gap=FlexGap::Small>
            {(!label.is_empty()).then(|| view! { <Label>{label}</Label> })}
            <Flex class="date-range-picker" align=FlexAlign::Center gap=FlexGap::Small>
                <DateInput value=date_from />
                <span>"—"</span>
                <DateInput value=date_to />
                <ButtonGroup>
                    <Button size=ButtonSize::Small on_click=move |_| set_range(month_range_input(today(), 0))>
                        "Этот месяц"
                    </Button>
                    <Button size=ButtonSize::Small on_click=move |_| set_range(month_range_input(today(), -1))>
                        "Прошлый"
                    </Button>
                    <Button size=ButtonSize::Small on_click=move |_| set_range(year_range_input(today().year()))>
                        "Год"
                    </Button>
                </ButtonGroup>
            </Flex>
        </Flex>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_crosses_year() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            month_range_input(today, -1),
            ("2025-12-01".to_string(), "2025-12-31".to_string())
        );
        assert_eq!(
            month_range_input(today, 0),
            ("2026-01-01".to_string(), "2026-01-31".to_string())
        );
    }

    #[test]
    fn whole_year() {
        assert_eq!(
            year_range_input(2025),
            ("2025-01-01".to_string(), "2025-12-31".to_string())
        );
    }
}
