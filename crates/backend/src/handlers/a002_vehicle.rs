use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use contracts::domain::a002_vehicle::{SetStatusRequest, Vehicle, VehicleDto};
use contracts::shared::list::{ListQuery, ListResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a002_vehicle;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// GET /api/vehicle
pub async fn list_all() -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(a002_vehicle::service::list_all().await?))
}

/// GET /api/vehicle/list?q=&limit=&offset=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Json<ListResponse<Vehicle>>> {
    Ok(Json(a002_vehicle::service::list(&query).await?))
}

/// GET /api/vehicle/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Vehicle>> {
    let uuid = parse_uuid(&id)?;
    let vehicle = a002_vehicle::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Автомобиль", &id))?;
    Ok(Json(vehicle))
}

/// POST /api/vehicle
pub async fn upsert(actor: Actor, Json(dto): Json<VehicleDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a002_vehicle::service::update(dto, &actor).await?;
            id
        }
        None => a002_vehicle::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/vehicle/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a002_vehicle::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Автомобиль", &id).into())
    }
}

/// POST /api/vehicle/:id/status
pub async fn set_status(
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    a002_vehicle::service::set_status(uuid, request.status, &actor).await?;
    Ok(StatusCode::OK)
}

/// GET /api/vehicle/available?from=2025-03-01&to=2025-03-05
pub async fn available(Query(period): Query<PeriodQuery>) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(a002_vehicle::service::available(period.from, period.to).await?))
}
