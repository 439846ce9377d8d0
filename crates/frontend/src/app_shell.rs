//! Корневые компоненты приложения
//!
//! - `AppShell`: показывает LoginPage или MainLayout
//! - `MainLayout`: Shell + Sidebar + вкладки, поток изменений с сервера

use crate::layout::global_context::{use_app_context, Tab as TabData};
use crate::layout::left::Sidebar;
use crate::layout::tabs::{tab_label_for_key, TabPage};
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::events::ChangeStream;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

/// Вкладка, открываемая после входа
const START_TAB: &str = "d401_executive_kpi";

#[component]
fn MainLayout() -> impl IntoView {
    let tabs_store = use_app_context();

    tabs_store.init_router_integration();
    if tabs_store.opened.with_untracked(|t| t.is_empty()) {
        tabs_store.open_tab(START_TAB, tab_label_for_key(START_TAB));
    }

    view! {
        <ChangeStream />
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=move || {
                view! {
                    <For
                        each=move || tabs_store.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab: TabData| {
                            view! { <TabPage tab=tab tabs_store=tabs_store /> }
                        }
                    />
                }
                .into_any()
            }
        />
    }
}

#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.access_token.is_some())
            fallback=move || {
                view! {
                    <Show
                        when=move || auth_state.with(|s| s.restoring)
                        fallback=|| view! { <LoginPage /> }
                    >
                        <div class="app-loading">"Восстановление сессии..."</div>
                    </Show>
                }
            }
        >
            <MainLayout />
        </Show>
    }
}
