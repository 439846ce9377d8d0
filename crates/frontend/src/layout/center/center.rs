use super::tab_bar::TabBar;
use leptos::prelude::*;

#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs">
            <TabBar />
            <div class="app-tabs__content">{children()}</div>
        </div>
    }
}
