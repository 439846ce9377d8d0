use contracts::system::notifications::Notification;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::{api, kind_label, severity_class, ENTITY};
use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;

/// Сколько непрочитанных показывать в выпадающем списке
const DROPDOWN_LIMIT: usize = 8;

/// Колокольчик в шапке: счётчик непрочитанных и последние уведомления
#[component]
pub fn NotificationBell() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let unread: RwSignal<Vec<Notification>> = RwSignal::new(Vec::new());
    let open = RwSignal::new(false);

    Effect::new(move |_| {
        let _ = ctx.revision(ENTITY);
        spawn_local(async move {
            match api::fetch_notifications(true).await {
                Ok(items) => unread.set(items),
                Err(e) => log::warn!("Failed to load notifications: {}", e),
            }
        });
    });

    let count = move || unread.with(|items| items.len());

    let mark_read = move |id: String| {
        spawn_local(async move {
            if let Err(e) = api::mark_read(&id).await {
                toasts.error(e);
            }
            ctx.bump(ENTITY);
        });
    };

    let mark_all = move |_| {
        spawn_local(async move {
            let result = api::mark_all_read().await;
            toasts.report(&result, "Все уведомления прочитаны");
            ctx.bump(ENTITY);
        });
    };

    let check_now = move |_| {
        spawn_local(async move {
            match api::check_now().await {
                Ok(resp) => toasts.info(format!(
                    "Новых уведомлений: {}, непрочитанных: {}",
                    resp.created, resp.unread_total
                )),
                Err(e) => toasts.error(e),
            }
            ctx.bump(ENTITY);
        });
    };

    let open_all = move |_| {
        open.set(false);
        ctx.open_tab("sys_notifications", tab_label_for_key("sys_notifications"));
    };

    view! {
        <div class="notification-bell">
            <button
                class="top-header__icon-button notification-bell__button"
                title="Уведомления"
                on:click=move |_| open.update(|v| *v = !*v)
            >
                {icon("bell")}
                <Show when=move || { count() > 0 }>
                    <span class="notification-bell__count">{count}</span>
                </Show>
            </button>

            <Show when=move || open.get()>
                <div class="notification-bell__dropdown">
                    <div class="notification-bell__header">
                        <span>"Уведомления"</span>
                        <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=check_now>
                            {icon("refresh")}
                        </Button>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=mark_all
                            disabled=Signal::derive(move || count() == 0)
                        >
                            {icon("check")}
                        </Button>
                    </div>
                    {move || {
                        let items = unread.get();
                        if items.is_empty() {
                            view! { <div class="notification-bell__empty">"Нет новых уведомлений"</div> }
                                .into_any()
                        } else {
                            items
                                .into_iter()
                                .take(DROPDOWN_LIMIT)
                                .map(|n| {
                                    let id = n.id.clone();
                                    view! {
                                        <div class="notification-bell__item">
                                            <span class=severity_class(n.severity)>{kind_label(n.kind)}</span>
                                            <div class="notification-bell__text">
                                                <div class="notification-bell__title">{n.title.clone()}</div>
                                                <div class="notification-bell__meta">{format_datetime(&n.created_at)}</div>
                                            </div>
                                            <button
                                                class="notification-bell__read"
                                                title="Прочитано"
                                                on:click=move |_| mark_read(id.clone())
                                            >
                                                {icon("x")}
                                            </button>
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                    <div class="notification-bell__footer">
                        <a href="#" on:click=move |ev| { ev.prevent_default(); open_all(ev); }>"Все уведомления"</a>
                    </div>
                </div>
            </Show>
        </div>
    }
}
