use contracts::system::auth::SessionInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::layout::global_context::{use_app_context, ALL_ENTITIES};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_utils::confirm_with_message;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;

/// Короткое описание браузера по User-Agent
pub fn browser_label(user_agent: Option<&str>) -> String {
    let Some(ua) = user_agent.filter(|s| !s.trim().is_empty()) else {
        return "-".to_string();
    };
    let browser = if ua.contains("Edg/") {
        "Edge"
    } else if ua.contains("Firefox/") {
        "Firefox"
    } else if ua.contains("Chrome/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else {
        return ua.chars().take(40).collect();
    };
    let os = if ua.contains("Windows") {
        " / Windows"
    } else if ua.contains("Android") {
        " / Android"
    } else if ua.contains("Mac OS") {
        " / macOS"
    } else if ua.contains("Linux") {
        " / Linux"
    } else {
        ""
    };
    format!("{}{}", browser, os)
}

#[component]
pub fn SessionsList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let sessions: RwSignal<Vec<SessionInfo>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let reload = RwSignal::new(0u32);

    Effect::new(move |_| {
        let _ = reload.get();
        let _ = ctx.revision(ALL_ENTITIES);
        loading.set(true);
        spawn_local(async move {
            match api::fetch_sessions().await {
                Ok(data) => {
                    sessions.set(data);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let revoke = move |session: SessionInfo| {
        if !confirm_with_message(&format!(
            "Завершить сессию пользователя {}?",
            session.username
        )) {
            return;
        }
        spawn_local(async move {
            let result = api::revoke_session(&session.id).await;
            toasts.report(&result, "Сессия завершена");
            reload.update(|v| *v += 1);
        });
    };

    view! {
        <PageFrame page_id="sys_sessions--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Активные сессии"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || sessions.with(|s| s.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload.update(|v| *v += 1)
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Обновить"
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
                            <TableHeaderCell resizable=true min_width=120.0>"Пользователь"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=120.0>"IP-адрес"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=160.0>"Браузер"</TableHeaderCell>
                            <TableHeaderCell min_width=130.0>"Вход"</TableHeaderCell>
                            <TableHeaderCell min_width=130.0>"Активность"</TableHeaderCell>
                            <TableHeaderCell min_width=130.0>"Истекает"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || sessions.get()
                            key=|s| s.id.clone()
                            children=move |session| {
                                let for_revoke = session.clone();
                                let last_used = session
                                    .last_used_at
                                    .as_deref()
                                    .map(format_datetime)
                                    .unwrap_or_else(|| "-".to_string());
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{session.username.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{session.ip_address.clone().unwrap_or_else(|| "-".into())}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {browser_label(session.user_agent.as_deref())}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_datetime(&session.created_at)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{last_used}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_datetime(&session.expires_at)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| revoke(for_revoke.clone())
                                                attr:title="Завершить"
                                            >
                                                {icon("log-out")}
                                            </Button>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_labels() {
        assert_eq!(browser_label(None), "-");
        assert_eq!(
            browser_label(Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
            )),
            "Chrome / Windows"
        );
        assert_eq!(
            browser_label(Some("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0")),
            "Firefox / Linux"
        );
        assert_eq!(browser_label(Some("curl/8.0")), "curl/8.0");
    }
}
