use contracts::domain::a001_customer::{BlacklistRequest, Customer, CustomerDto};
use contracts::shared::duplicates::DuplicateGroup;
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{delete, get_json, post_json, post_no_content, query_string, IdResponse};

pub async fn fetch_customers(q: &str) -> Result<ListResponse<Customer>, String> {
    let params = [("q", q.to_string()), ("limit", ListQuery::MAX_LIMIT.to_string())];
    get_json(&format!("/api/customer/list{}", query_string(&params))).await
}

pub async fn fetch_customer(id: &str) -> Result<Customer, String> {
    get_json(&format!("/api/customer/{}", id)).await
}

/// Создать или обновить клиента, возвращает id
pub async fn save_customer(dto: &CustomerDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/customer", dto).await?;
    Ok(saved.id)
}

pub async fn delete_customer(id: &str) -> Result<(), String> {
    delete(&format!("/api/customer/{}", id)).await
}

pub async fn fetch_duplicates() -> Result<Vec<DuplicateGroup>, String> {
    get_json("/api/customer/duplicates").await
}

pub async fn set_blacklist(id: &str, request: &BlacklistRequest) -> Result<(), String> {
    post_no_content(&format!("/api/customer/{}/blacklist", id), request).await
}
