//! Sidebar с раскрывающимися группами меню

use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<(&'static str, &'static str)>, // (tab key, icon)
    admin_only: bool,
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "dashboards",
            label: "Дашборды",
            icon: "dashboard",
            items: vec![
                ("d401_executive_kpi", "activity"),
                ("d400_fleet_analytics", "bar-chart"),
                ("d402_tax_summary", "percent"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "fleet",
            label: "Автопарк",
            icon: "car",
            items: vec![("a002_vehicle", "car"), ("a006_maintenance", "wrench")],
            admin_only: false,
        },
        MenuGroup {
            id: "rental",
            label: "Прокат",
            icon: "file-text",
            items: vec![("a003_rental_contract", "file-text"), ("a001_customer", "customers")],
            admin_only: false,
        },
        MenuGroup {
            id: "staff",
            label: "Персонал",
            icon: "briefcase",
            items: vec![("a005_employee", "briefcase")],
            admin_only: false,
        },
        MenuGroup {
            id: "warehouse",
            label: "Склад",
            icon: "package",
            items: vec![("a004_inventory_item", "package")],
            admin_only: false,
        },
        MenuGroup {
            id: "accounting",
            label: "Бухгалтерия",
            icon: "wallet",
            items: vec![("a007_ledger_entry", "wallet"), ("d402_tax_summary", "percent")],
            admin_only: false,
        },
        MenuGroup {
            id: "security",
            label: "Безопасность",
            icon: "shield",
            items: vec![
                ("d403_security_overview", "shield"),
                ("sys_audit", "list"),
                ("sys_sessions", "monitor"),
                ("sys_users", "user"),
                ("sys_email", "mail"),
            ],
            admin_only: true,
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    let is_admin = auth_state.with_untracked(|state| state.is_admin());

    // Группа "Дашборды" раскрыта при входе
    let expanded_groups = RwSignal::new(vec!["dashboards".to_string()]);

    let groups = get_menu_groups();

    view! {
        <div class="app-sidebar__content">
            {groups
                .into_iter()
                .filter(|group| !group.admin_only || is_admin)
                .map(|group| {
                    let group_id = group.id.to_string();
                    let gid_click = group_id.clone();
                    let gid_chevron = group_id.clone();
                    let gid_show = group_id.clone();
                    let items = StoredValue::new(group.items.clone());

                    view! {
                        <div>
                            <div
                                class="app-sidebar__item"
                                style:padding-left="12px"
                                on:click=move |_| {
                                    let gid = gid_click.clone();
                                    expanded_groups.update(move |ids| {
                                        if let Some(pos) = ids.iter().position(|x| *x == gid) {
                                            ids.remove(pos);
                                        } else {
                                            ids.push(gid);
                                        }
                                    });
                                }
                            >
                                <div class="app-sidebar__item-content">
                                    {icon(group.icon)}
                                    <span>{group.label}</span>
                                </div>
                                <div
                                    class="app-sidebar__chevron"
                                    class:app-sidebar__chevron--expanded=move || {
                                        expanded_groups.get().contains(&gid_chevron)
                                    }
                                >
                                    {icon("chevron-right")}
                                </div>
                            </div>

                            <Show when=move || expanded_groups.get().contains(&gid_show)>
                                <div class="app-sidebar__children">
                                    {items
                                        .get_value()
                                        .into_iter()
                                        .map(|(key, icon_name)| {
                                            let label = tab_label_for_key(key);
                                            view! {
                                                <div
                                                    class="app-sidebar__item"
                                                    class:app-sidebar__item--active=move || {
                                                        ctx.active.get().as_deref() == Some(key)
                                                    }
                                                    style:padding-left="10px"
                                                    on:click=move |_| ctx.open_tab(key, label)
                                                >
                                                    <div class="app-sidebar__item-content">
                                                        {icon(icon_name)}
                                                        <span>{label}</span>
                                                    </div>
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </Show>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_menu_item_has_a_label() {
        for group in get_menu_groups() {
            for (key, _) in group.items {
                assert!(!tab_label_for_key(key).is_empty(), "no label for {}", key);
            }
        }
    }

    #[test]
    fn only_security_group_is_admin_only() {
        let admin: Vec<_> = get_menu_groups()
            .into_iter()
            .filter(|g| g.admin_only)
            .map(|g| g.id)
            .collect();
        assert_eq!(admin, ["security"]);
    }
}
