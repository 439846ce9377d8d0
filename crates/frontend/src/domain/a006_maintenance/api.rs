use contracts::domain::a006_maintenance::{MaintenanceDto, MaintenanceRecord};
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{delete, get_json, post_json, query_string, IdResponse};

pub fn list_path(vehicle_id: &str, q: &str) -> String {
    let params = [
        ("vehicle_id", vehicle_id.to_string()),
        ("q", q.to_string()),
        ("limit", ListQuery::MAX_LIMIT.to_string()),
    ];
    format!("/api/maintenance{}", query_string(&params))
}

/// Журнал обслуживания, опционально по одному автомобилю
pub async fn fetch_records(vehicle_id: &str, q: &str) -> Result<ListResponse<MaintenanceRecord>, String> {
    get_json(&list_path(vehicle_id, q)).await
}

pub async fn fetch_record(id: &str) -> Result<MaintenanceRecord, String> {
    get_json(&format!("/api/maintenance/{}", id)).await
}

pub async fn save_record(dto: &MaintenanceDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/maintenance", dto).await?;
    Ok(saved.id)
}

pub async fn delete_record(id: &str) -> Result<(), String> {
    delete(&format!("/api/maintenance/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_omits_empty_vehicle() {
        assert_eq!(list_path("", ""), "/api/maintenance?limit=1000");
        assert_eq!(
            list_path("7f7c", "масло"),
            "/api/maintenance?vehicle_id=7f7c&q=%D0%BC%D0%B0%D1%81%D0%BB%D0%BE&limit=1000"
        );
    }
}
