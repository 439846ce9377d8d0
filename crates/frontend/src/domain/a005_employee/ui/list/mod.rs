use contracts::domain::a005_employee::{Employee, EmployeeStatus, PayrollSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_employee::ui::details::EmployeeDetails;
use crate::domain::a005_employee::{api, COLLECTION};
use crate::layout::global_context::use_app_context;
use crate::shared::components::stat_card::format_money;
use crate::shared::components::table_checkbox::{Selection, TableCheckbox, TableHeaderCheckbox};
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::{format_naive, format_opt_date};
use crate::shared::export::{csv_number, download_server_export, export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_f64, cmp_text, confirm_with_message, get_sort_indicator, records_label, sort_list,
    toggle_sort, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

impl Sortable for Employee {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "code" => cmp_text(&self.base.code, &other.base.code),
            "position" => cmp_text(&self.position, &other.position),
            "department" => cmp_text(&self.department, &other.department),
            "hire_date" => self.hire_date.cmp(&other.hire_date),
            "salary" => cmp_f64(self.salary, other.salary),
            "status" => cmp_text(self.status.label(), other.status.label()),
            _ => cmp_text(&self.base.description, &other.base.description),
        }
    }
}

impl ExcelExportable for Employee {
    fn headers() -> Vec<&'static str> {
        vec![
            "Таб. номер",
            "ФИО",
            "Должность",
            "Отдел",
            "Телефон",
            "Email",
            "Дата приёма",
            "Оклад",
            "Статус",
            "Дата увольнения",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.base.description.clone(),
            self.position.clone(),
            self.department.clone(),
            self.phone.clone(),
            self.email.clone().unwrap_or_default(),
            format_naive(&self.hire_date),
            csv_number(self.salary),
            self.status.label().to_string(),
            format_opt_date(&self.termination_date),
        ]
    }
}

pub fn matches_filters(employee: &Employee, status: &str, department: &str) -> bool {
    (status.is_empty() || employee.status.as_str() == status)
        && (department.is_empty() || employee.department == department)
}

pub fn departments(employees: &[Employee]) -> Vec<String> {
    let mut result: Vec<String> = employees.iter().map(|e| e.department.clone()).collect();
    result.sort();
    result.dedup();
    result
}

pub fn status_class(status: EmployeeStatus) -> &'static str {
    match status {
        EmployeeStatus::Active => "badge badge--success",
        EmployeeStatus::OnLeave => "badge badge--warning",
        EmployeeStatus::Terminated => "badge badge--neutral",
    }
}

const DETAIL_FRAME: &str = "width: min(1100px, 95vw); max-height: 90vh; overflow-y: auto;";

#[component]
pub fn EmployeeList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items: RwSignal<Vec<Employee>> = RwSignal::new(Vec::new());
    let total = RwSignal::new(0u64);
    let search = RwSignal::new(String::new());
    let status_filter = RwSignal::new(String::new());
    let department_filter = RwSignal::new(String::new());
    let sort_field = RwSignal::new("name".to_string());
    let sort_ascending = RwSignal::new(true);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selection = Selection::new();

    let load_data = move || {
        let query = search.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_employees(&query).await {
                Ok(page) => {
                    total.set(page.total);
                    items.set(page.items);
                }
                Err(e) => error.set(Some(format!("Не удалось загрузить сотрудников: {}", e))),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        search.track();
        ctx.revision(COLLECTION);
        load_data();
    });

    let department_options = Signal::derive(move || items.with(|list| departments(list)));

    let visible = Signal::derive(move || {
        let status = status_filter.get();
        let department = department_filter.get();
        let mut data: Vec<Employee> = items
            .get()
            .into_iter()
            .filter(|e| matches_filters(e, &status, &department))
            .collect();
        sort_list(&mut data, &sort_field.get(), sort_ascending.get());
        data
    });

    let on_sort = move |field: &'static str| {
        move |_| {
            let (f, asc) =
                toggle_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
            sort_field.set(f);
            sort_ascending.set(asc);
        }
    };
    let indicator = move |field: &'static str| {
        move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())
    };

    let open_details = move |id: Option<String>| {
        modal_stack.push_with_frame(Some(DETAIL_FRAME.to_string()), move |handle| {
            let close = handle.clone();
            view! {
                <EmployeeDetails
                    id=id.clone()
                    on_saved=Callback::new(move |_| {
                        close.close();
                        toasts.success("Сотрудник сохранён");
                        ctx.bump(COLLECTION);
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    let open_payroll = move |_| {
        modal_stack.push_with_frame(Some("width: min(640px, 95vw);".to_string()), move |handle| {
            view! { <PayrollView on_close=Callback::new(move |_| handle.close()) /> }.into_any()
        });
    };

    let delete_selected = move |_| {
        let ids = selection.get();
        if ids.is_empty() || !confirm_with_message(&format!("Удалить {}?", records_label(ids.len()))) {
            return;
        }
        spawn_local(async move {
            let mut failed = Vec::new();
            for id in &ids {
                if let Err(e) = api::delete_employee(id).await {
                    failed.push(e);
                }
            }
            if failed.is_empty() {
                toasts.success(format!("Удалено: {}", records_label(ids.len())));
            } else {
                toasts.error(failed.join("; "));
            }
            selection.clear();
            ctx.bump(COLLECTION);
        });
    };

    let export_visible = move |_| {
        if let Err(e) = export_to_excel(&visible.get_untracked(), "employees.csv") {
            toasts.warning(e);
        }
    };
    let export_all = move |_| {
        spawn_local(async move {
            let result = download_server_export(COLLECTION).await;
            toasts.report(&result, "Выгрузка сформирована");
        });
    };

    let all_checked = Signal::derive(move || {
        let n = visible.with(|v| v.len());
        n > 0 && selection.len() == n
    });
    let on_check_all = Callback::new(move |checked: bool| {
        if checked {
            selection.set_all(visible.get_untracked().iter().map(|e| e.to_string_id()).collect());
        } else {
            selection.clear();
        }
    });

    view! {
        <PageFrame page_id="a005_employee--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Сотрудники"</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        {move || format!("{} / {}", visible.with(|v| v.len()), total.get())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("user-plus")}
                        " Новый"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=open_payroll>
                        {icon("wallet")}
                        " ФОТ"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=export_visible>
                        {icon("download")}
                        " Excel"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=export_all>
                        {icon("download")}
                        " Выгрузить всё"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=delete_selected
                        disabled=Signal::derive(move || selection.is_empty())
                    >
                        {icon("delete")}
                        {move || format!(" Удалить ({})", selection.len())}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| ctx.bump(COLLECTION)
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
                    <Flex gap=FlexGap::Small align=FlexAlign::End style="flex-wrap: wrap;">
                        <div style="flex: 1; max-width: 300px;">
                            <Input value=search placeholder="ФИО, телефон, должность...">
                                <InputPrefix slot>{icon("search")}</InputPrefix>
                            </Input>
                        </div>
                        <div style="width: 170px;">
                            <Select value=status_filter>
                                <option value="">"Все статусы"</option>
                                {EmployeeStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <div style="width: 200px;">
                            <Select value=department_filter>
                                <option value="">"Все отделы"</option>
                                {move || department_options
                                    .get()
                                    .into_iter()
                                    .map(|d| view! { <option value=d.clone()>{d.clone()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox checked=all_checked on_change=on_check_all />
                            <TableHeaderCell min_width=90.0>
                                <div class="table__sortable-header" on:click=on_sort("code")>
                                    "Таб. №"
                                    <span class="table__header-sort-indicator">{indicator("code")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=200.0>
                                <div class="table__sortable-header" on:click=on_sort("name")>
                                    "ФИО"
                                    <span class="table__header-sort-indicator">{indicator("name")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=140.0>
                                <div class="table__sortable-header" on:click=on_sort("position")>
                                    "Должность"
                                    <span class="table__header-sort-indicator">{indicator("position")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=120.0>
                                <div class="table__sortable-header" on:click=on_sort("department")>
                                    "Отдел"
                                    <span class="table__header-sort-indicator">{indicator("department")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("hire_date")>
                                    "Принят"
                                    <span class="table__header-sort-indicator">{indicator("hire_date")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("salary")>
                                    "Оклад"
                                    <span class="table__header-sort-indicator">{indicator("salary")}</span>
                                </div>
                            </TableHeaderCell>
                            <TableHeaderCell min_width=110.0>
                                <div class="table__sortable-header" on:click=on_sort("status")>
                                    "Статус"
                                    <span class="table__header-sort-indicator">{indicator("status")}</span>
                                </div>
                            </TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|e| (e.to_string_id(), e.base.metadata.version)
                            children=move |employee| {
                                let id = employee.to_string_id();
                                let id_for_open = id.clone();
                                let terminated = employee.status == EmployeeStatus::Terminated;
                                let code = employee.base.code.clone();
                                let full_name = employee.base.description.clone();
                                let position = employee.position.clone();
                                let department = employee.department.clone();
                                let hire_date = format_naive(&employee.hire_date);
                                let salary = format_money(employee.salary);
                                let status = employee.status;
                                view! {
                                    <TableRow
                                        class:table__row--muted=terminated
                                        on:click=move |_| open_details(Some(id_for_open.clone()))
                                    >
                                        <TableCheckbox checked=selection.checked(id.clone()) on_change=selection.on_toggle(id.clone()) />
                                        <TableCell>
                                            <TableCellLayout>{code}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style="font-weight: 500;">{full_name}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{position}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{department}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{hire_date}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{salary}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span class=status_class(status)>{status.label()}</span>
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

/// Доля отдела в общем ФОТ, проценты
pub fn payroll_share(department_total: f64, summary: &PayrollSummary) -> f64 {
    if summary.monthly_total <= 0.0 {
        0.0
    } else {
        department_total / summary.monthly_total * 100.0
    }
}

/// Строка таблицы ФОТ: отдел, численность, сумма в месяц, доля
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRow {
    pub department: String,
    pub headcount: u32,
    pub monthly_total: String,
    pub share: String,
}

/// Готовые к выводу строки. Забирает сводку целиком, строки таблицы владеют данными.
pub fn payroll_rows(summary: PayrollSummary) -> Vec<PayrollRow> {
    let shares: Vec<String> = summary
        .departments
        .iter()
        .map(|d| format!("{:.1}%", payroll_share(d.monthly_total, &summary)))
        .collect();
    summary
        .departments
        .into_iter()
        .zip(shares)
        .map(|(d, share)| PayrollRow {
            department: d.department,
            headcount: d.headcount,
            monthly_total: format_money(d.monthly_total),
            share,
        })
        .collect()
}

#[component]
fn PayrollView(on_close: Callback<()>) -> impl IntoView {
    let summary: RwSignal<Option<PayrollSummary>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    spawn_local(async move {
        match api::fetch_payroll().await {
            Ok(data) => summary.set(Some(data)),
            Err(e) => error.set(Some(e)),
        }
    });

    view! {
        <div class="modal-header">
            <h2 class="modal-title">"Фонд оплаты труда"</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}
            {move || match summary.get() {
                None => view! { <Spinner /> }.into_any(),
                Some(data) => {
                    let headcount = data.headcount;
                    let monthly_total = format_money(data.monthly_total);
                    let rows = payroll_rows(data)
                        .into_iter()
                        .map(|row| {
                            let PayrollRow { department, headcount, monthly_total, share } = row;
                            view! {
                                <TableRow>
                                    <TableCell><TableCellLayout>{department}</TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>{headcount}</TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>{monthly_total}</TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>{share}</TableCellLayout></TableCell>
                                </TableRow>
                            }
                        })
                        .collect_view();
                    view! {
                        <Table attr:style="width: 100%;">
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell>"Отдел"</TableHeaderCell>
                                    <TableHeaderCell>"Чел."</TableHeaderCell>
                                    <TableHeaderCell>"В месяц"</TableHeaderCell>
                                    <TableHeaderCell>"Доля"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {rows}
                                <TableRow>
                                    <TableCell><TableCellLayout><strong>"Итого"</strong></TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout><strong>{headcount}</strong></TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout><strong>{monthly_total}</strong></TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>""</TableCellLayout></TableCell>
                                </TableRow>
                            </TableBody>
                        </Table>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a005_employee::{DepartmentPayroll, EmployeeDto};

    fn employee(name: &str, department: &str, status: EmployeeStatus) -> Employee {
        Employee::new_for_insert(&EmployeeDto {
            full_name: name.into(),
            position: "Механик".into(),
            department: department.into(),
            phone: "+7 900 000-00-02".into(),
            national_id: "4500000002".into(),
            hire_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            salary: 60_000.0,
            status,
            ..Default::default()
        })
    }

    #[test]
    fn filters_by_status_and_department() {
        let e = employee("Иванов", "Сервис", EmployeeStatus::OnLeave);
        assert!(matches_filters(&e, "", ""));
        assert!(matches_filters(&e, "OnLeave", "Сервис"));
        assert!(!matches_filters(&e, "Active", ""));
        assert!(!matches_filters(&e, "", "Офис"));
    }

    #[test]
    fn departments_are_unique() {
        let list = vec![
            employee("А", "Сервис", EmployeeStatus::Active),
            employee("Б", "Офис", EmployeeStatus::Active),
            employee("В", "Сервис", EmployeeStatus::Active),
        ];
        assert_eq!(departments(&list), vec!["Офис".to_string(), "Сервис".to_string()]);
    }

    #[test]
    fn payroll_share_handles_empty_fund() {
        let empty = PayrollSummary {
            departments: Vec::new(),
            headcount: 0,
            monthly_total: 0.0,
        };
        assert_eq!(payroll_share(100.0, &empty), 0.0);

        let summary = PayrollSummary {
            departments: vec![DepartmentPayroll {
                department: "Сервис".into(),
                headcount: 2,
                monthly_total: 50_000.0,
            }],
            headcount: 4,
            monthly_total: 200_000.0,
        };
        assert_eq!(payroll_share(50_000.0, &summary), 25.0);
    }

    #[test]
    fn payroll_rows_own_department_data() {
        let summary = PayrollSummary {
            departments: vec![
                DepartmentPayroll {
                    department: "Сервис".into(),
                    headcount: 3,
                    monthly_total: 150_000.0,
                },
                DepartmentPayroll {
                    department: "Офис".into(),
                    headcount: 1,
                    monthly_total: 50_000.0,
                },
            ],
            headcount: 4,
            monthly_total: 200_000.0,
        };
        let rows = payroll_rows(summary);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "Сервис");
        assert_eq!(rows[0].headcount, 3);
        assert_eq!(rows[0].share, "75.0%");
        assert_eq!(rows[1].share, "25.0%");
        assert_eq!(rows[1].monthly_total, format_money(50_000.0));
    }

    #[test]
    fn csv_row_matches_headers() {
        let e = employee("Петров", "Сервис", EmployeeStatus::Active);
        let row = e.to_csv_row();
        assert_eq!(row.len(), Employee::headers().len());
        assert_eq!(row[7], "60000,00");
        assert_eq!(row[8], "Работает");
    }
}
