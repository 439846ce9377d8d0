use contracts::dashboards::d403_security_overview::SecurityOverviewResponse;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use contracts::system::audit::AuditEntry;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d403_security_overview::api;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::stat_card::StatCard;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

pub const WINDOW_OPTIONS: [(u32, &str); 4] = [
    (24, "24 часа"),
    (72, "3 дня"),
    (168, "Неделя"),
    (720, "30 дней"),
];

pub fn parse_window(value: &str) -> u32 {
    value
        .parse::<u32>()
        .ok()
        .filter(|h| WINDOW_OPTIONS.iter().any(|(w, _)| w == h))
        .unwrap_or(24)
}

/// Доля неудачных входов, %
pub fn failure_rate(failed: u32, successful: u32) -> Option<f64> {
    let total = failed + successful;
    (total > 0).then(|| failed as f64 * 100.0 / total as f64)
}

pub fn failed_status(failed: u32, locked: usize) -> IndicatorStatus {
    if locked > 0 {
        IndicatorStatus::Bad
    } else if failed > 0 {
        IndicatorStatus::Warning
    } else {
        IndicatorStatus::Good
    }
}

fn event_class(entry: &AuditEntry) -> &'static str {
    use contracts::system::audit::AuditAction;
    match entry.action {
        AuditAction::LoginFailed => "badge badge--error",
        AuditAction::LoginSuccess => "badge badge--success",
        AuditAction::SessionRevoked | AuditAction::PasswordChanged => "badge badge--warning",
        _ => "badge",
    }
}

#[component]
pub fn SecurityOverviewDashboard() -> impl IntoView {
    let window = RwSignal::new("24".to_string());
    let data: RwSignal<Option<SecurityOverviewResponse>> = RwSignal::new(None);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let reload = RwSignal::new(0u32);

    Effect::new(move |_| {
        let hours = parse_window(&window.get());
        reload.track();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::get_security_overview(hours).await {
                Ok(response) => data.set(Some(response)),
                Err(e) => {
                    log::error!("d403 security overview: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let failed = move || data.with(|d| d.as_ref().map(|d| d.failed_logins));
    let successful = move || data.with(|d| d.as_ref().map(|d| d.successful_logins));
    let locked = move || data.with(|d| d.as_ref().map(|d| d.locked_accounts.clone()).unwrap_or_default());
    let top_ips = move || data.with(|d| d.as_ref().map(|d| d.top_ips.clone()).unwrap_or_default());
    let events = move || data.with(|d| d.as_ref().map(|d| d.events.clone()).unwrap_or_default());

    view! {
        <PageFrame page_id="d403_security_overview--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("shield")}
                    <h1 class="page__title">"Безопасность"</h1>
                </div>
                <div class="page__header-right">
                    <div style="width: 140px;">
                        <Select value=window>
                            {WINDOW_OPTIONS
                                .iter()
                                .map(|(hours, label)| view! { <option value=hours.to_string()>{*label}</option> })
                                .collect_view()}
                        </Select>
                    </div>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload.update(|n| *n += 1)
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
                <div class="indicator-set__grid indicator-set__grid--cols-4">
                    <StatCard
                        label="Неудачные входы"
                        icon_name="alert-triangle"
                        value=Signal::derive(move || failed().map(f64::from))
                        format=ValueFormat::Integer
                        status=Signal::derive(move || {
                            failed_status(failed().unwrap_or(0), locked().len())
                        })
                        subtitle=Signal::derive(move || {
                            failure_rate(failed().unwrap_or(0), successful().unwrap_or(0))
                                .map(|r| format!("{:.1}% попыток", r).replace('.', ","))
                        })
                    />
                    <StatCard
                        label="Успешные входы"
                        icon_name="check"
                        value=Signal::derive(move || successful().map(f64::from))
                        format=ValueFormat::Integer
                        status=IndicatorStatus::Neutral
                    />
                    <StatCard
                        label="Заблокированные"
                        icon_name="lock"
                        value=Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.locked_accounts.len() as f64)))
                        format=ValueFormat::Integer
                        status=Signal::derive(move || {
                            if locked().is_empty() { IndicatorStatus::Good } else { IndicatorStatus::Bad }
                        })
                    />
                    <StatCard
                        label="Активные сессии"
                        icon_name="monitor"
                        value=Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.active_sessions as f64)))
                        format=ValueFormat::Integer
                        status=IndicatorStatus::Neutral
                    />
                </div>

                <Show when=move || !locked().is_empty()>
                    <div class="warning-box">
                        <span class="warning-box__icon">{icon("lock")}</span>
                        <span class="warning-box__text">
                            "Заблокированы после неудачных попыток: "
                            {move || locked().join(", ")}
                        </span>
                    </div>
                </Show>

                <CardAnimated delay_ms=60 title="Источники неудачных входов">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=140.0>"IP-адрес"</TableHeaderCell>
                                <TableHeaderCell min_width=80.0>"Попыток"</TableHeaderCell>
                                <TableHeaderCell min_width=200.0>"Логины"</TableHeaderCell>
                                <TableHeaderCell min_width=150.0>"Последняя"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=top_ips
                                key=|s| s.ip_address.clone()
                                children=move |stat| {
                                    let suspicious = stat.suspicious;
                                    view! {
                                        <TableRow>
                                            <TableCell><TableCellLayout>{stat.ip_address.clone()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{stat.failed_attempts}</TableCellLayout></TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{stat.usernames.join(", ")}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&stat.last_attempt_at)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                {suspicious.then(|| view! {
                                                    <span class="badge badge--error">"Подозрительный"</span>
                                                })}
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || top_ips().is_empty()>
                        <div class="text--muted" style="padding: 12px;">"Неудачных входов нет"</div>
                    </Show>
                </CardAnimated>

                <CardAnimated delay_ms=120 title="События безопасности">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=150.0>"Время"</TableHeaderCell>
                                <TableHeaderCell min_width=140.0>"Событие"</TableHeaderCell>
                                <TableHeaderCell min_width=120.0>"Пользователь"</TableHeaderCell>
                                <TableHeaderCell min_width=120.0>"IP"</TableHeaderCell>
                                <TableHeaderCell min_width=200.0>"Подробности"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=events
                                key=|e| e.id
                                children=move |entry| {
                                    let class = event_class(&entry);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&entry.timestamp)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class=class>{entry.action.label()}</span>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{entry.username.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{entry.ip_address.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{entry.details.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </CardAnimated>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_falls_back_to_one_day() {
        assert_eq!(parse_window("168"), 168);
        assert_eq!(parse_window("5"), 24);
        assert_eq!(parse_window("abc"), 24);
    }

    #[test]
    fn failure_rate_handles_empty_window() {
        assert_eq!(failure_rate(0, 0), None);
        assert_eq!(failure_rate(1, 3), Some(25.0));
    }

    #[test]
    fn lockouts_outrank_failures() {
        assert_eq!(failed_status(0, 0), IndicatorStatus::Good);
        assert_eq!(failed_status(3, 0), IndicatorStatus::Warning);
        assert_eq!(failed_status(3, 1), IndicatorStatus::Bad);
    }
}
