use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_customer::{BlacklistRequest, Customer, CustomerDto};
use contracts::shared::duplicates::DuplicateGroup;
use contracts::shared::list::{ListQuery, ListResponse};
use serde_json::json;

use crate::domain::a001_customer;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

/// GET /api/customer
pub async fn list_all() -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(a001_customer::service::list_all().await?))
}

/// GET /api/customer/list?q=&limit=&offset=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Json<ListResponse<Customer>>> {
    Ok(Json(a001_customer::service::list(&query).await?))
}

/// GET /api/customer/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Customer>> {
    let uuid = parse_uuid(&id)?;
    let customer = a001_customer::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Клиент", &id))?;
    Ok(Json(customer))
}

/// POST /api/customer
pub async fn upsert(actor: Actor, Json(dto): Json<CustomerDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a001_customer::service::update(dto, &actor).await?;
            id
        }
        None => a001_customer::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/customer/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a001_customer::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Клиент", &id).into())
    }
}

/// GET /api/customer/duplicates
pub async fn duplicates() -> ApiResult<Json<Vec<DuplicateGroup>>> {
    Ok(Json(a001_customer::service::duplicates().await?))
}

/// POST /api/customer/:id/blacklist
pub async fn set_blacklist(
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<BlacklistRequest>,
) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    a001_customer::service::set_blacklist(uuid, request, &actor).await?;
    Ok(StatusCode::OK)
}
