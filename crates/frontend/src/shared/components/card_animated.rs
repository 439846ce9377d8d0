//! Карточка-секция формы или дашборда (thaw `Card` + анимация появления).
//!
//! Секции одной страницы получают нарастающий `delay_ms`, тогда они
//! появляются по очереди. Анимация `card-appear` описана в `layout.css`.

use leptos::prelude::*;
use thaw::Card;

/// Inline-стиль анимации с задержкой и дополнительными правилами
pub fn appear_style(delay_ms: u32, extra: &str) -> String {
    let base = format!("animation: card-appear 0.28s ease-out {}ms both;", delay_ms);
    if extra.trim().is_empty() {
        base
    } else {
        format!("{} {}", base, extra.trim())
    }
}

#[component]
pub fn CardAnimated(
    #[prop(optional)]
    delay_ms: u32,
    /// Заголовок секции (`h4.details-section__title`)
    #[prop(optional, into)]
    title: String,
    #[prop(optional, into)]
    style: String,
    children: Children,
) -> impl IntoView {
    let heading = (!title.is_empty()).then(|| view! { <h4 class="details-section__title">{title}</h4> });

    view! {
        <Card attr:style=appear_style(delay_ms, &style)>
            {heading}
            {children()}
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_appends_extra_rules() {
        assert_eq!(
            appear_style(80, ""),
            "animation: card-appear 0.28s ease-out 80ms both;"
        );
        assert_eq!(
            appear_style(0, " max-width: 400px; "),
            "animation: card-appear 0.28s ease-out 0ms both; max-width: 400px;"
        );
    }
}
