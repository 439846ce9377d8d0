use contracts::domain::a003_rental_contract::{
    CompleteContractRequest, ContractListItem, ContractStatus, PaymentRequest, RentalContract,
    RentalContractDto,
};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::email::SendEmailResponse;

use crate::shared::api_utils::{
    delete, get_json, post_empty, post_json, post_no_content, query_string, IdResponse,
};

pub fn list_path(status: Option<ContractStatus>, q: &str, limit: u64, offset: u64) -> String {
    let params = [
        ("status", status.map(|s| s.as_str().to_string()).unwrap_or_default()),
        ("q", q.to_string()),
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
    ];
    format!("/api/rental_contract{}", query_string(&params))
}

pub async fn fetch_contracts(
    status: Option<ContractStatus>,
    q: &str,
) -> Result<ListResponse<ContractListItem>, String> {
    get_json(&list_path(status, q, ListQuery::MAX_LIMIT, 0)).await
}

pub async fn fetch_contract(id: &str) -> Result<RentalContract, String> {
    get_json(&format!("/api/rental_contract/{}", id)).await
}

pub async fn save_contract(dto: &RentalContractDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/rental_contract", dto).await?;
    Ok(saved.id)
}

pub async fn delete_contract(id: &str) -> Result<(), String> {
    delete(&format!("/api/rental_contract/{}", id)).await
}

pub async fn complete_contract(id: &str, request: &CompleteContractRequest) -> Result<(), String> {
    post_no_content(&format!("/api/rental_contract/{}/complete", id), request).await
}

pub async fn cancel_contract(id: &str) -> Result<(), String> {
    post_empty(&format!("/api/rental_contract/{}/cancel", id)).await
}

pub async fn record_payment(id: &str, amount: f64) -> Result<(), String> {
    post_no_content(
        &format!("/api/rental_contract/{}/payment", id),
        &PaymentRequest { amount },
    )
    .await
}

/// Сводка по договору на email клиента
pub async fn email_summary(id: &str) -> Result<SendEmailResponse, String> {
    post_json(&format!("/api/rental_contract/{}/email", id), &serde_json::json!({})).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_skips_empty_filters() {
        assert_eq!(
            list_path(None, "", 100, 0),
            "/api/rental_contract?limit=100&offset=0"
        );
        assert_eq!(
            list_path(Some(ContractStatus::Active), "RC-1", 50, 50),
            "/api/rental_contract?status=Active&q=RC-1&limit=50&offset=50"
        );
    }
}
