use crate::layout::global_context::{use_app_context, Tab as TabData};
use leptos::ev;
use leptos::prelude::*;

#[component]
fn TabButton(tab: TabData) -> impl IntoView {
    let tabs_store = use_app_context();

    let key_for_active = tab.key.clone();
    let is_active =
        Memo::new(move |_| tabs_store.active.get().as_deref() == Some(key_for_active.as_str()));

    let key_for_click = tab.key.clone();
    let on_click = move |_| tabs_store.activate_tab(&key_for_click);

    let key_for_close = tab.key.clone();
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key_for_close);
    };

    let key_for_title = tab.key.clone();
    let title = move || {
        tabs_store.opened.with(|tabs| {
            tabs.iter()
                .find(|t| t.key == key_for_title)
                .map(|t| t.title.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="tab-bar__tab" class:tab-bar__tab--active=is_active on:click=on_click>
            <span class="tab-bar__title">{title}</span>
            <button class="tab-bar__close" on:click=on_close title="Закрыть">"×"</button>
        </div>
    }
}

/// Полоса открытых вкладок
#[component]
pub fn TabBar() -> impl IntoView {
    let tabs_store = use_app_context();

    view! {
        <Show when=move || tabs_store.opened.with(|t| !t.is_empty())>
            <div class="tab-bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab| view! { <TabButton tab=tab /> }
                />
            </div>
        </Show>
    }
}
