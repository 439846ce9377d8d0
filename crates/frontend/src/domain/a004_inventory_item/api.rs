use contracts::domain::a004_inventory_item::{AdjustStockRequest, InventoryItem, InventoryItemDto};
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{delete, get_json, post_json, query_string, IdResponse};

pub async fn fetch_items(q: &str) -> Result<ListResponse<InventoryItem>, String> {
    let params = [("q", q.to_string()), ("limit", ListQuery::MAX_LIMIT.to_string())];
    get_json(&format!("/api/inventory_item/list{}", query_string(&params))).await
}

/// Позиции с остатком на минимуме или ниже
pub async fn fetch_low_stock() -> Result<Vec<InventoryItem>, String> {
    get_json("/api/inventory_item/low-stock").await
}

pub async fn fetch_item(id: &str) -> Result<InventoryItem, String> {
    get_json(&format!("/api/inventory_item/{}", id)).await
}

pub async fn save_item(dto: &InventoryItemDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/inventory_item", dto).await?;
    Ok(saved.id)
}

pub async fn delete_item(id: &str) -> Result<(), String> {
    delete(&format!("/api/inventory_item/{}", id)).await
}

/// Приход или списание, возвращает позицию с новым остатком
pub async fn adjust_stock(id: &str, request: &AdjustStockRequest) -> Result<InventoryItem, String> {
    post_json(&format!("/api/inventory_item/{}/adjust", id), request).await
}
