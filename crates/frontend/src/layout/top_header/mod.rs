//! TopHeader: переключатель меню, колокольчик уведомлений, пользователь, выход

use crate::layout::global_context::use_app_context;
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::notifications::bell::NotificationBell;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");
    let (auth_state, set_auth_state) = use_auth();

    let toggle_sidebar = move |_| ctx.toggle_left();

    let logout = move |_| {
        modal_stack.clear();
        ctx.close_all();
        spawn_local(async move {
            do_logout(set_auth_state).await;
        });
    };

    let is_sidebar_visible = move || ctx.left_open.get();

    let user_label = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| {
                    if u.is_admin {
                        format!("{} (админ)", u.display_name())
                    } else {
                        u.display_name().to_string()
                    }
                })
                .unwrap_or_else(|| "Гость".to_string())
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=toggle_sidebar
                    title=move || if is_sidebar_visible() { "Скрыть навигацию" } else { "Показать навигацию" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                {icon("car")}
                <span class="top-header__title">"Прокат автомобилей"</span>
            </div>

            <div class="top-header__actions">
                <NotificationBell />

                <div class="top-header__user">
                    {icon("user")}
                    <span>{user_label}</span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Выход">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
