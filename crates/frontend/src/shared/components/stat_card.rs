use crate::shared::icons::icon;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;

/// Форматирование значения KPI: разряды через NBSP, десятичная запятая
pub fn format_value(val: f64, fmt: &ValueFormat) -> String {
    match fmt {
        ValueFormat::Money { currency } => {
            let abs = val.abs();
            let formatted = if abs >= 1_000_000.0 {
                format!("{:.1}M", val / 1_000_000.0).replace('.', ",")
            } else if abs >= 1_000.0 {
                let cents = (val * 100.0).round() as i64;
                let int_part = cents / 100;
                let frac = (cents % 100).abs();
                let s = format_thousands(int_part);
                if frac == 0 {
                    s
                } else {
                    format!("{},{:02}", s, frac)
                }
            } else {
                format!("{:.2}", val).replace('.', ",")
            };
            format!("{} {}", formatted, currency_symbol(currency))
        }
        ValueFormat::Number { decimals } => {
            format!("{:.prec$}", val, prec = *decimals as usize).replace('.', ",")
        }
        ValueFormat::Percent { decimals } => {
            format!("{:.prec$}%", val, prec = *decimals as usize).replace('.', ",")
        }
        ValueFormat::Integer => format_thousands(val.round() as i64),
    }
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "RUB" => "₽",
        other => other,
    }
}

pub fn format_thousands(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Денежная сумма для таблиц
pub fn format_money(val: f64) -> String {
    format_value(val, &ValueFormat::rub())
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    #[prop(into)]
    label: String,
    /// Icon name from the icon() helper
    #[prop(into)]
    icon_name: String,
    /// Primary numeric value (None = loading/error)
    #[prop(into)]
    value: Signal<Option<f64>>,
    format: ValueFormat,
    #[prop(into)]
    status: Signal<IndicatorStatus>,
    /// Change % relative to previous period
    #[prop(into, optional)]
    change_percent: Signal<Option<f64>>,
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let status_class = move || match status.get() {
        IndicatorStatus::Good => "stat-card stat-card--success",
        IndicatorStatus::Bad => "stat-card stat-card--error",
        IndicatorStatus::Warning => "stat-card stat-card--warning",
        IndicatorStatus::Neutral => "stat-card",
    };

    let formatted = move || match value.get() {
        Some(v) => format_value(v, &format),
        None => "—".to_string(),
    };

    let change_view = move || {
        change_percent.get().map(|pct| {
            let (arrow, cls) = if pct > 0.5 {
                ("\u{2191}", "stat-card__change stat-card__change--up")
            } else if pct < -0.5 {
                ("\u{2193}", "stat-card__change stat-card__change--down")
            } else {
                ("", "stat-card__change stat-card__change--flat")
            };
            let text = format!("{}{:.1}%", arrow, pct.abs()).replace('.', ",");
            view! { <span class=cls>{text}</span> }
        })
    };

    let subtitle_view = move || {
        subtitle
            .get()
            .map(|s| view! { <div class="stat-card__subtitle">{s}</div> })
    };

    view! {
        <div class=status_class>
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">
                    {formatted}
                    {change_view}
                </div>
                {subtitle_view}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_use_nbsp() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(1234567), "1\u{a0}234\u{a0}567");
        assert_eq!(format_thousands(-4500), "-4\u{a0}500");
    }

    #[test]
    fn money_formats() {
        assert_eq!(format_value(950.5, &ValueFormat::rub()), "950,50 ₽");
        assert_eq!(format_value(12500.0, &ValueFormat::rub()), "12\u{a0}500 ₽");
        assert_eq!(format_value(12500.25, &ValueFormat::rub()), "12\u{a0}500,25 ₽");
        assert_eq!(format_value(2_460_000.0, &ValueFormat::rub()), "2,5M ₽");
        assert_eq!(
            format_value(100.0, &ValueFormat::Money { currency: "USD".into() }),
            "100,00 USD"
        );
    }

    #[test]
    fn percent_and_integer() {
        assert_eq!(format_value(42.345, &ValueFormat::Percent { decimals: 1 }), "42,3%");
        assert_eq!(format_value(7.0, &ValueFormat::Integer), "7");
        assert_eq!(format_value(3.14159, &ValueFormat::Number { decimals: 2 }), "3,14");
    }
}
