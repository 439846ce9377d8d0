use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_inventory_item::{AdjustStockRequest, InventoryItem, InventoryItemDto};
use contracts::shared::list::{ListQuery, ListResponse};
use serde_json::json;

use crate::domain::a004_inventory_item;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

/// GET /api/inventory_item
pub async fn list_all() -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(a004_inventory_item::service::list_all().await?))
}

/// GET /api/inventory_item/list?q=&limit=&offset=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Json<ListResponse<InventoryItem>>> {
    Ok(Json(a004_inventory_item::service::list(&query).await?))
}

/// GET /api/inventory_item/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<InventoryItem>> {
    let uuid = parse_uuid(&id)?;
    let item = a004_inventory_item::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Складская позиция", &id))?;
    Ok(Json(item))
}

/// POST /api/inventory_item
pub async fn upsert(actor: Actor, Json(dto): Json<InventoryItemDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a004_inventory_item::service::update(dto, &actor).await?;
            id
        }
        None => a004_inventory_item::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/inventory_item/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a004_inventory_item::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Складская позиция", &id).into())
    }
}

/// POST /api/inventory_item/:id/adjust
pub async fn adjust(
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<AdjustStockRequest>,
) -> ApiResult<Json<InventoryItem>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a004_inventory_item::service::adjust(uuid, request, &actor).await?))
}

/// GET /api/inventory_item/low-stock
pub async fn low_stock() -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(a004_inventory_item::service::low_stock().await?))
}
