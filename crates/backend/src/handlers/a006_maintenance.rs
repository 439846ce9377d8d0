use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a006_maintenance::{MaintenanceDto, MaintenanceRecord};
use contracts::shared::list::{ListQuery, ListResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a006_maintenance;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceQuery {
    pub vehicle_id: Option<String>,
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// GET /api/maintenance?vehicle_id=
pub async fn list(Query(query): Query<MaintenanceQuery>) -> ApiResult<Json<ListResponse<MaintenanceRecord>>> {
    let vehicle_id = match query.vehicle_id.as_deref().filter(|v| !v.is_empty()) {
        Some(raw) => Some(parse_uuid(raw)?),
        None => None,
    };
    let page = ListQuery {
        q: query.q,
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(a006_maintenance::service::list(vehicle_id, &page).await?))
}

/// GET /api/maintenance/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<MaintenanceRecord>> {
    let uuid = parse_uuid(&id)?;
    let record = a006_maintenance::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Запись обслуживания", &id))?;
    Ok(Json(record))
}

/// POST /api/maintenance
pub async fn upsert(actor: Actor, Json(dto): Json<MaintenanceDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a006_maintenance::service::update(dto, &actor).await?;
            id
        }
        None => a006_maintenance::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/maintenance/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a006_maintenance::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Запись обслуживания", &id).into())
    }
}
