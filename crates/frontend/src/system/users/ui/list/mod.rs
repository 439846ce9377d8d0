use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{ChangePasswordForm, CreateUserForm, EditUserForm};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, confirm_with_message, get_sort_indicator, sort_list, toggle_sort, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::use_auth;
use crate::system::users::api;

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "full_name" => cmp_text(
                self.full_name.as_deref().unwrap_or(""),
                other.full_name.as_deref().unwrap_or(""),
            ),
            "email" => cmp_text(
                self.email.as_deref().unwrap_or(""),
                other.email.as_deref().unwrap_or(""),
            ),
            "is_admin" => self.is_admin.cmp(&other.is_admin),
            "is_active" => self.is_active.cmp(&other.is_active),
            "created_at" => self.created_at.cmp(&other.created_at),
            "last_login_at" => self
                .last_login_at
                .as_deref()
                .unwrap_or("")
                .cmp(other.last_login_at.as_deref().unwrap_or("")),
            _ => cmp_text(&self.username, &other.username),
        }
    }
}

/// Фильтр по логину, ФИО и email
pub fn matches_search(user: &User, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        Some(user.username.as_str()),
        user.full_name.as_deref(),
        user.email.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|v| v.to_lowercase().contains(&query))
}

#[component]
pub fn UsersList() -> impl IntoView {
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");
    let (auth_state, _) = use_auth();

    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let search = RwSignal::new(String::new());
    let sort_field = RwSignal::new("username".to_string());
    let sort_ascending = RwSignal::new(true);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let load_data = move || {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(data) => all_users.set(data),
                Err(e) => error.set(Some(format!("Не удалось загрузить пользователей: {}", e))),
            }
            loading.set(false);
        });
    };

    load_data();

    let visible = Signal::derive(move || {
        let query = search.get();
        let mut data: Vec<User> = all_users
            .get()
            .into_iter()
            .filter(|u| matches_search(u, &query))
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });

    let on_sort = move |field: &'static str| {
        move |_| {
            let (f, asc) = toggle_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
            sort_field.set(f);
            sort_ascending.set(asc);
        }
    };
    let indicator = move |field: &'static str| {
        move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())
    };

    let open_create = move |_| {
        modal_stack.push_with_frame(Some("width: 480px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <CreateUserForm
                    on_close=Callback::new(move |_| handle.close())
                    on_saved=Callback::new(move |_| {
                        close.close();
                        load_data();
                    })
                />
            }
            .into_any()
        });
    };

    let open_edit = move |user: User| {
        modal_stack.push_with_frame(Some("width: 480px;".to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <EditUserForm
                    user=user.clone()
                    on_close=Callback::new(move |_| handle.close())
                    on_saved=Callback::new(move |_| {
                        close.close();
                        load_data();
                    })
                />
            }
            .into_any()
        });
    };

    let open_password = move |user: User| {
        let own = auth_state
            .get_untracked()
            .user_info
            .map(|u| u.id == user.id)
            .unwrap_or(false);
        modal_stack.push_with_frame(Some("width: 420px;".to_string()), move |handle| {
            view! {
                <ChangePasswordForm
                    user_id=user.id.clone()
                    username=user.username.clone()
                    require_old=own
                    on_close=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let remove = move |user: User| {
        if !confirm_with_message(&format!("Удалить пользователя {}?", user.username)) {
            return;
        }
        spawn_local(async move {
            let result = api::delete_user(&user.id).await;
            toasts.report(&result, "Пользователь удалён");
            load_data();
        });
    };

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Пользователи"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || visible.with(|v| v.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=open_create>
                        {icon("plus")}
                        " Новый"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
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
                <div class="filter-panel-content">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div style="flex: 1; max-width: 320px;">
                            <Input value=search placeholder="Логин, ФИО или Email...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell resizable=true min_width=140.0>
                                <div class="table__sortable-header" on:click=on_sort("username")>
                                    "Логин"
                                    <span class="table__header-sort-indicator">{indicator("username")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=160.0>
                                <div class="table__sortable-header" on:click=on_sort("full_name")>
                                    "ФИО"
                                    <span class="table__header-sort-indicator">{indicator("full_name")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=160.0>
                                <div class="table__sortable-header" on:click=on_sort("email")>
                                    "Email"
                                    <span class="table__header-sort-indicator">{indicator("email")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("is_admin")>
                                    "Роль"
                                    <span class="table__header-sort-indicator">{indicator("is_admin")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=90.0>
                                <div class="table__sortable-header" on:click=on_sort("is_active")>
                                    "Статус"
                                    <span class="table__header-sort-indicator">{indicator("is_active")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=130.0>
                                <div class="table__sortable-header" on:click=on_sort("created_at")>
                                    "Создан"
                                    <span class="table__header-sort-indicator">{indicator("created_at")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=130.0>
                                <div class="table__sortable-header" on:click=on_sort("last_login_at")>
                                    "Последний вход"
                                    <span class="table__header-sort-indicator">{indicator("last_login_at")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|u| (u.id.clone(), u.updated_at.clone())
                            children=move |user| {
                                let for_edit = user.clone();
                                let for_password = user.clone();
                                let for_delete = user.clone();
                                let last_login = user
                                    .last_login_at
                                    .as_deref()
                                    .map(format_datetime)
                                    .unwrap_or_else(|| "-".to_string());
                                let role_class = if user.is_admin { "badge badge--warning" } else { "badge badge--neutral" };
                                let username = user.username.clone();
                                let full_name = user.full_name.clone().unwrap_or_default();
                                let email = user.email.clone().unwrap_or_default();
                                let role = user.role_label();
                                let active = user.is_active;
                                let created_at = format_datetime(&user.created_at);
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style="font-weight: 500;">{username}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {full_name}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {email}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span class=role_class>{role}</span>
                                        </TableCell>
                                        <TableCell>
                                            {if active {
                                                view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                            } else {
                                                view! { <span class="badge badge--error">"Заблок."</span> }.into_any()
                                            }}
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{created_at}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{last_login}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| open_edit(for_edit.clone())
                                                attr:title="Редактировать"
                                            >
                                                {icon("edit")}
                                            </Button>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| open_password(for_password.clone())
                                                attr:title="Сменить пароль"
                                            >
                                                {icon("lock")}
                                            </Button>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| remove(for_delete.clone())
                                                attr:title="Удалить"
                                            >
                                                {icon("delete")}
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

    fn user(username: &str, full_name: Option<&str>) -> User {
        User {
            id: username.to_string(),
            username: username.to_string(),
            email: Some(format!("{}@rental.local", username)),
            full_name: full_name.map(str::to_string),
            is_active: true,
            is_admin: false,
            created_at: "2025-01-01T00:00:00Z".into(),
            updated_at: "2025-01-01T00:00:00Z".into(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn search_matches_any_field() {
        let u = user("manager", Some("Петров Пётр"));
        assert!(matches_search(&u, ""));
        assert!(matches_search(&u, "ПЕТРОВ"));
        assert!(matches_search(&u, "rental.local"));
        assert!(!matches_search(&u, "admin"));
    }

    #[test]
    fn sorts_by_full_name_with_missing_values_first() {
        let mut users = vec![user("b", Some("Яковлев")), user("a", None), user("c", Some("Абрамов"))];
        sort_list(&mut users, "full_name", true);
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
