//! PageFrame: корневая обёртка каждой страницы внутри вкладки.
//!
//! ```rust,ignore
//! view! {
//!     <PageFrame page_id="a002_vehicle--list" category=PAGE_CAT_LIST>
//!         <div class="page__header">...</div>
//!         <div class="page__content">...</div>
//!     </PageFrame>
//! }
//! ```

use super::page_standard::page_class;
use leptos::prelude::*;

#[component]
pub fn PageFrame(
    /// HTML id в формате `{entity}--{category}`
    page_id: &'static str,
    /// Одна из констант PAGE_CAT_*
    category: &'static str,
    /// Дополнительные CSS классы
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(super::page_standard::is_valid_page_id(page_id));

    let base_class = page_class(category);
    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}
