use contracts::domain::a005_employee::{Employee, EmployeeDto, PayrollSummary};
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{delete, get_json, post_json, query_string, IdResponse};

pub async fn fetch_employees(q: &str) -> Result<ListResponse<Employee>, String> {
    let params = [("q", q.to_string()), ("limit", ListQuery::MAX_LIMIT.to_string())];
    get_json(&format!("/api/employee/list{}", query_string(&params))).await
}

pub async fn fetch_employee(id: &str) -> Result<Employee, String> {
    get_json(&format!("/api/employee/{}", id)).await
}

pub async fn save_employee(dto: &EmployeeDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/employee", dto).await?;
    Ok(saved.id)
}

pub async fn delete_employee(id: &str) -> Result<(), String> {
    delete(&format!("/api/employee/{}", id)).await
}

/// ФОТ по отделам (без уволенных)
pub async fn fetch_payroll() -> Result<PayrollSummary, String> {
    get_json("/api/employee/payroll").await
}
