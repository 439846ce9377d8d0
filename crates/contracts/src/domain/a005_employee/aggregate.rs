use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::common::{short_code, today, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::duplicates::{DuplicateCandidate, DuplicateKind};
use crate::shared::validation::{
    normalize_email, normalize_national_id, normalize_phone, require, round_money, validate_email,
    validate_national_id, validate_non_negative, validate_phone,
};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор сотрудника
    EmployeeId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 3] = [
        EmployeeStatus::Active,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::OnLeave => "OnLeave",
            EmployeeStatus::Terminated => "Terminated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Работает",
            EmployeeStatus::OnLeave => "В отпуске",
            EmployeeStatus::Terminated => "Уволен",
        }
    }

    /// Сотрудник получает зарплату
    pub fn on_payroll(&self) -> bool {
        !matches!(self, EmployeeStatus::Terminated)
    }
}

impl std::str::FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Неизвестный статус сотрудника: {}", s))
    }
}

/// Сотрудник. `base.description` – ФИО, `base.code` – табельный номер.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub base: BaseAggregate<EmployeeId>,

    pub position: String,
    pub department: String,
    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub status: EmployeeStatus,
    pub termination_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new_for_insert(dto: &EmployeeDto) -> Self {
        let id = EmployeeId::new_v4();
        let code = dto
            .code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| short_code("EMP", id.value()));
        let mut employee = Self {
            base: BaseAggregate::new(id, code, String::new()),
            position: String::new(),
            department: String::new(),
            phone: String::new(),
            national_id: String::new(),
            email: None,
            hire_date: dto.hire_date,
            salary: 0.0,
            status: EmployeeStatus::Active,
            termination_date: None,
        };
        employee.update(dto);
        employee
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &EmployeeDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.full_name.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.position = dto.position.trim().to_string();
        self.department = dto.department.trim().to_string();
        self.phone = dto.phone.trim().to_string();
        self.national_id = dto.national_id.trim().to_string();
        self.email = dto
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());
        self.hire_date = dto.hire_date;
        self.salary = dto.salary;
        self.status = dto.status;
        self.termination_date = if dto.status == EmployeeStatus::Terminated {
            dto.termination_date
        } else {
            None
        };
    }

    pub fn validate(&self) -> Result<(), String> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), String> {
        require(&self.base.description, "ФИО")?;
        require(&self.position, "Должность")?;
        require(&self.department, "Отдел")?;
        validate_phone(&self.phone)?;
        validate_national_id(&self.national_id)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        validate_non_negative(self.salary, "Оклад")?;
        if self.hire_date > today {
            return Err("Дата приёма не может быть в будущем".into());
        }
        if self.status == EmployeeStatus::Terminated {
            match self.termination_date {
                None => return Err("Укажите дату увольнения".into()),
                Some(date) if date < self.hire_date => {
                    return Err("Дата увольнения раньше даты приёма".into())
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl DuplicateCandidate for Employee {
    fn candidate_id(&self) -> String {
        self.to_string_id()
    }

    fn candidate_name(&self) -> String {
        self.base.description.clone()
    }

    fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)> {
        vec![
            (DuplicateKind::Phone, normalize_phone(&self.phone)),
            (DuplicateKind::NationalId, normalize_national_id(&self.national_id)),
        ]
    }
}

impl AggregateRoot for Employee {
    type Id = EmployeeId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "employee"
    }

    fn element_name() -> &'static str {
        "Сотрудник"
    }

    fn list_name() -> &'static str {
        "Сотрудники"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmployeeDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub salary: f64,
    #[serde(default)]
    pub status: EmployeeStatus,
    pub termination_date: Option<NaiveDate>,
    pub comment: Option<String>,
}

impl From<&Employee> for EmployeeDto {
    fn from(e: &Employee) -> Self {
        Self {
            id: Some(e.to_string_id()),
            code: Some(e.base.code.clone()),
            full_name: e.base.description.clone(),
            position: e.position.clone(),
            department: e.department.clone(),
            phone: e.phone.clone(),
            national_id: e.national_id.clone(),
            email: e.email.clone(),
            hire_date: e.hire_date,
            salary: e.salary,
            status: e.status,
            termination_date: e.termination_date,
            comment: e.base.comment.clone(),
        }
    }
}

/// Фонд оплаты труда по отделу
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPayroll {
    pub department: String,
    pub headcount: u32,
    pub monthly_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub departments: Vec<DepartmentPayroll>,
    pub headcount: u32,
    pub monthly_total: f64,
}

impl PayrollSummary {
    /// Свести оклады действующих сотрудников по отделам
    pub fn from_employees(employees: &[Employee]) -> Self {
        let mut by_department: BTreeMap<&str, (u32, f64)> = BTreeMap::new();
        for employee in employees
            .iter()
            .filter(|e| e.status.on_payroll() && !e.base.metadata.is_deleted)
        {
            let entry = by_department.entry(employee.department.as_str()).or_default();
            entry.0 += 1;
            entry.1 += employee.salary;
        }

        let departments: Vec<DepartmentPayroll> = by_department
            .into_iter()
            .map(|(department, (headcount, total))| DepartmentPayroll {
                department: department.to_string(),
                headcount,
                monthly_total: round_money(total),
            })
            .collect();

        Self {
            headcount: departments.iter().map(|d| d.headcount).sum(),
            monthly_total: round_money(departments.iter().map(|d| d.monthly_total).sum()),
            departments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dto(name: &str, department: &str, salary: f64, status: EmployeeStatus) -> EmployeeDto {
        EmployeeDto {
            full_name: name.into(),
            position: "Менеджер".into(),
            department: department.into(),
            phone: "+7 900 000-00-01".into(),
            national_id: "4500000001".into(),
            hire_date: d(2022, 2, 1),
            salary,
            status,
            termination_date: None,
            ..Default::default()
        }
    }

    #[test]
    fn terminated_requires_date() {
        let mut e = Employee::new_for_insert(&dto("Петров", "Прокат", 60_000.0, EmployeeStatus::Terminated));
        assert!(e.validate_on(d(2025, 1, 1)).is_err());
        e.termination_date = Some(d(2021, 1, 1));
        assert!(e.validate_on(d(2025, 1, 1)).is_err());
        e.termination_date = Some(d(2024, 12, 31));
        assert!(e.validate_on(d(2025, 1, 1)).is_ok());
    }

    #[test]
    fn future_hire_date_rejected() {
        let e = Employee::new_for_insert(&dto("Петров", "Прокат", 60_000.0, EmployeeStatus::Active));
        assert!(e.validate_on(d(2022, 1, 31)).is_err());
        assert!(e.base.code.starts_with("EMP-"));
    }

    #[test]
    fn payroll_groups_by_department() {
        let staff = vec![
            Employee::new_for_insert(&dto("А", "Сервис", 50_000.0, EmployeeStatus::Active)),
            Employee::new_for_insert(&dto("Б", "Прокат", 40_000.0, EmployeeStatus::OnLeave)),
            Employee::new_for_insert(&dto("В", "Сервис", 55_000.0, EmployeeStatus::Active)),
            Employee::new_for_insert(&dto("Г", "Сервис", 99_000.0, EmployeeStatus::Terminated)),
        ];
        let summary = PayrollSummary::from_employees(&staff);
        assert_eq!(summary.headcount, 3);
        assert_eq!(summary.monthly_total, 145_000.0);
        assert_eq!(summary.departments[0].department, "Прокат");
        assert_eq!(summary.departments[1].monthly_total, 105_000.0);
    }
}
