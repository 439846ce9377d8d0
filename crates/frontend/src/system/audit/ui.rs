use contracts::system::audit::{AuditAction, AuditEntry, AuditQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::layout::global_context::{use_app_context, ALL_ENTITIES};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_datetime;
use crate::shared::export::{export_to_excel, ExcelExportable};
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;

const PAGE_SIZE: u64 = 100;

/// Коллекции, по которым пишется журнал
const ENTITIES: [(&str, &str); 10] = [
    ("customer", "Клиенты"),
    ("vehicle", "Автопарк"),
    ("rental_contract", "Договоры"),
    ("inventory_item", "Склад"),
    ("employee", "Сотрудники"),
    ("maintenance", "Обслуживание"),
    ("ledger_entry", "Бухгалтерия"),
    ("user", "Пользователи"),
    ("session", "Сессии"),
    ("email", "Письма"),
];

fn action_class(action: AuditAction) -> &'static str {
    match action {
        AuditAction::LoginFailed | AuditAction::Delete => "badge badge--error",
        a if a.is_security() => "badge badge--warning",
        _ => "badge badge--neutral",
    }
}

impl ExcelExportable for AuditEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Время", "Пользователь", "Действие", "Объект", "ID", "Подробности", "IP"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            format_datetime(&self.timestamp),
            self.username.clone().unwrap_or_default(),
            self.action.label().to_string(),
            self.entity.clone(),
            self.entity_id.clone().unwrap_or_default(),
            self.details.clone().unwrap_or_default(),
            self.ip_address.clone().unwrap_or_default(),
        ]
    }
}

#[component]
pub fn AuditLogList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let entries: RwSignal<Vec<AuditEntry>> = RwSignal::new(Vec::new());
    let entity = RwSignal::new(String::new());
    let action = RwSignal::new(String::new());
    let user = RwSignal::new(String::new());
    let offset = RwSignal::new(0u64);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let load = move || {
        let query = AuditQuery {
            entity: non_empty(&entity.get_untracked()),
            user: non_empty(&user.get_untracked()),
            action: non_empty(&action.get_untracked()),
            limit: Some(PAGE_SIZE),
            offset: Some(offset.get_untracked()),
        };
        loading.set(true);
        spawn_local(async move {
            match api::fetch_audit(&query).await {
                Ok(data) => {
                    entries.set(data);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };

    // Новый фильтр начинает с первой страницы
    Effect::new(move |_| {
        let _ = (entity.get(), action.get(), ctx.revision(ALL_ENTITIES));
        offset.set(0);
        load();
    });

    let has_next = move || entries.with(|e| e.len() as u64 == PAGE_SIZE);
    let page_label = move || format!("Стр. {}", offset.get() / PAGE_SIZE + 1);

    let export = move |_| {
        let data = entries.get_untracked();
        if let Err(e) = export_to_excel(&data, "audit_log.csv") {
            toasts.error(e);
        }
    };

    view! {
        <PageFrame page_id="sys_audit--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Журнал аудита"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
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

            <div class="filter-panel">
                <div class="filter-panel-header">
                    <div class="filter-panel-header__left">
                        {icon("filter")}
                        <span class="filter-panel__title">"Фильтры"</span>
                    </div>
                    <div class="filter-panel-header__center">
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| {
                                offset.update(|o| *o = o.saturating_sub(PAGE_SIZE));
                                load();
                            }
                            disabled=Signal::derive(move || offset.get() == 0)
                        >
                            "‹"
                        </Button>
                        <span class="filter-panel__page">{page_label}</span>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| {
                                offset.update(|o| *o += PAGE_SIZE);
                                load();
                            }
                            disabled=Signal::derive(move || !has_next())
                        >
                            "›"
                        </Button>
                    </div>
                </div>
                <div class="filter-panel-content">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <Flex vertical=true>
                            <Label>"Объект"</Label>
                            <Select value=entity size=SelectSize::Small>
                                <option value="">"Все"</option>
                                {ENTITIES
                                    .iter()
                                    .map(|(key, label)| view! { <option value=*key>{*label}</option> })
                                    .collect_view()}
                            </Select>
                        </Flex>
                        <Flex vertical=true>
                            <Label>"Действие"</Label>
                            <Select value=action size=SelectSize::Small>
                                <option value="">"Все"</option>
                                {AuditAction::ALL
                                    .iter()
                                    .map(|a| view! { <option value=a.as_str()>{a.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </Flex>
                        <Flex vertical=true>
                            <Label>"Пользователь"</Label>
                            <Input value=user placeholder="Логин" />
                        </Flex>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| {
                                offset.set(0);
                                load();
                            }
                        >
                            {icon("search")}
                            " Найти"
                        </Button>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=130.0>"Время"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=110.0>"Пользователь"</TableHeaderCell>
                            <TableHeaderCell min_width=140.0>"Действие"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=120.0>"Объект"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=240.0>"Подробности"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"IP"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || entries.get()
                            key=|e| e.id
                            children=move |entry| {
                                let object = match &entry.entity_id {
                                    Some(id) => format!("{} {}", entry.entity, id.chars().take(8).collect::<String>()),
                                    None => entry.entity.clone(),
                                };
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout>{format_datetime(&entry.timestamp)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {entry.username.clone().unwrap_or_else(|| "-".into())}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span class=action_class(entry.action)>{entry.action.label()}</span>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{object}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {entry.details.clone().unwrap_or_default()}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{entry.ip_address.clone().unwrap_or_default()}</TableCellLayout>
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
    fn security_actions_are_highlighted() {
        assert_eq!(action_class(AuditAction::LoginFailed), "badge badge--error");
        assert_eq!(action_class(AuditAction::PasswordChanged), "badge badge--warning");
        assert_eq!(action_class(AuditAction::Payment), "badge badge--neutral");
    }
}
