use chrono::NaiveDate;
use contracts::domain::a002_vehicle::{SetStatusRequest, Vehicle, VehicleDto, VehicleStatus};
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{delete, get_json, post_json, post_no_content, query_string, IdResponse};

pub async fn fetch_vehicles(q: &str) -> Result<ListResponse<Vehicle>, String> {
    let params = [("q", q.to_string()), ("limit", ListQuery::MAX_LIMIT.to_string())];
    get_json(&format!("/api/vehicle/list{}", query_string(&params))).await
}

/// Все автомобили без пагинации (для выбора в формах)
pub async fn fetch_all_vehicles() -> Result<Vec<Vehicle>, String> {
    get_json("/api/vehicle").await
}

/// Свободные на весь период автомобили
pub async fn fetch_available(from: NaiveDate, to: NaiveDate) -> Result<Vec<Vehicle>, String> {
    let params = [("from", from.to_string()), ("to", to.to_string())];
    get_json(&format!("/api/vehicle/available{}", query_string(&params))).await
}

pub async fn fetch_vehicle(id: &str) -> Result<Vehicle, String> {
    get_json(&format!("/api/vehicle/{}", id)).await
}

pub async fn save_vehicle(dto: &VehicleDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/vehicle", dto).await?;
    Ok(saved.id)
}

pub async fn delete_vehicle(id: &str) -> Result<(), String> {
    delete(&format!("/api/vehicle/{}", id)).await
}

pub async fn set_status(id: &str, status: VehicleStatus) -> Result<(), String> {
    post_no_content(&format!("/api/vehicle/{}/status", id), &SetStatusRequest { status }).await
}
