use contracts::system::notifications::Notification;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::{api, entity_tab, kind_label, severity_class, ENTITY};
use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;

#[component]
pub fn NotificationsList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let items: RwSignal<Vec<Notification>> = RwSignal::new(Vec::new());
    let unread_only = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let _ = ctx.revision(ENTITY);
        let only_unread = unread_only.get();
        loading.set(true);
        spawn_local(async move {
            match api::fetch_notifications(only_unread).await {
                Ok(data) => {
                    items.set(data);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let unread_count = move || items.with(|list| list.iter().filter(|n| !n.is_read()).count());

    let check_now = move |_| {
        spawn_local(async move {
            match api::check_now().await {
                Ok(resp) => toasts.success(format!("Проверка выполнена, новых: {}", resp.created)),
                Err(e) => toasts.error(e),
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

    let mark_read = move |id: String| {
        spawn_local(async move {
            if let Err(e) = api::mark_read(&id).await {
                toasts.error(e);
            }
            ctx.bump(ENTITY);
        });
    };

    let remove = move |id: String| {
        spawn_local(async move {
            let result = api::delete_notification(&id).await;
            toasts.report(&result, "Уведомление удалено");
            ctx.bump(ENTITY);
        });
    };

    view! {
        <PageFrame page_id="sys_notifications--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Уведомления"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || unread_count().to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Checkbox checked=unread_only label="Только непрочитанные" />
                    <Button appearance=ButtonAppearance::Secondary on_click=mark_all>
                        {icon("check")}
                        " Прочитать все"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=check_now
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Проверить сроки"
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
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=110.0>"Важность"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=140.0>"Тип"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=280.0>"Уведомление"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=130.0>"Создано"</TableHeaderCell>
                            <TableHeaderCell min_width=160.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            let list = items.get();
                            if list.is_empty() {
                                return view! {
                                    <TableRow>
                                        <TableCell attr:colspan="5">
                                            <span class="table__cell--muted">"Нет уведомлений"</span>
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any();
                            }
                            list.into_iter()
                                .map(|n| {
                                    let read = n.is_read();
                                    let id_read = n.id.clone();
                                    let id_delete = n.id.clone();
                                    let target = entity_tab(&n.entity);
                                    let severity_text = n.severity.as_str();
                                    view! {
                                        <TableRow class:table__row--muted=read>
                                            <TableCell>
                                                <span class=severity_class(n.severity)>{severity_text}</span>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{kind_label(n.kind)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <div class="notification__title">{n.title.clone()}</div>
                                                <div class="notification__message">{n.message.clone()}</div>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&n.created_at)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                {target.map(|key| view! {
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| ctx.open_tab(key, tab_label_for_key(key))
                                                    >
                                                        {icon("chevron-right")}
                                                    </Button>
                                                })}
                                                <Show when=move || !read>
                                                    {
                                                        let id = id_read.clone();
                                                        view! {
                                                            <Button
                                                                size=ButtonSize::Small
                                                                appearance=ButtonAppearance::Subtle
                                                                on_click=move |_| mark_read(id.clone())
                                                            >
                                                                {icon("check")}
                                                            </Button>
                                                        }
                                                    }
                                                </Show>
                                                <Button
                                                    size=ButtonSize::Small
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| remove(id_delete.clone())
                                                >
                                                    {icon("delete")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}
