use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a005_employee::{Employee, EmployeeDto, PayrollSummary};
use contracts::shared::list::{ListQuery, ListResponse};
use serde_json::json;

use crate::domain::a005_employee;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

/// GET /api/employee
pub async fn list_all() -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(a005_employee::service::list_all().await?))
}

pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Json<ListResponse<Employee>>> {
    Ok(Json(a005_employee::service::list(&query).await?))
}

/// GET /api/employee/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Employee>> {
    let uuid = parse_uuid(&id)?;
    let employee = a005_employee::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Сотрудник", &id))?;
    Ok(Json(employee))
}

/// POST /api/employee
pub async fn upsert(actor: Actor, Json(dto): Json<EmployeeDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a005_employee::service::update(dto, &actor).await?;
            id
        }
        None => a005_employee::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/employee/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a005_employee::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Сотрудник", &id).into())
    }
}

/// GET /api/employee/payroll
pub async fn payroll() -> ApiResult<Json<PayrollSummary>> {
    Ok(Json(a005_employee::service::payroll_summary().await?))
}
