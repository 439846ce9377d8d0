use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_rental_contract::{
    CompleteContractRequest, ContractListItem, ContractStatus, PaymentRequest, RentalContract,
    RentalContractDto,
};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::email::SendEmailResponse;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a003_rental_contract;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

#[derive(Debug, Default, Deserialize)]
pub struct ContractQuery {
    pub status: Option<ContractStatus>,
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// GET /api/rental_contract?status=Active&q=&limit=&offset=
pub async fn list(Query(query): Query<ContractQuery>) -> ApiResult<Json<ListResponse<ContractListItem>>> {
    let page = ListQuery {
        q: query.q,
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(a003_rental_contract::service::list(query.status, &page).await?))
}

/// GET /api/rental_contract/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<RentalContract>> {
    let uuid = parse_uuid(&id)?;
    let contract = a003_rental_contract::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Договор аренды", &id))?;
    Ok(Json(contract))
}

/// POST /api/rental_contract
pub async fn upsert(actor: Actor, Json(dto): Json<RentalContractDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a003_rental_contract::service::update(dto, &actor).await?;
            id
        }
        None => a003_rental_contract::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/rental_contract/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a003_rental_contract::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Договор аренды", &id).into())
    }
}

/// POST /api/rental_contract/:id/complete
pub async fn complete(
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<CompleteContractRequest>,
) -> ApiResult<Json<RentalContract>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a003_rental_contract::service::complete(uuid, request, &actor).await?))
}

/// POST /api/rental_contract/:id/cancel
pub async fn cancel(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    a003_rental_contract::service::cancel(uuid, &actor).await?;
    Ok(StatusCode::OK)
}

/// POST /api/rental_contract/:id/payment
pub async fn record_payment(
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<Json<RentalContract>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(
        a003_rental_contract::service::record_payment(uuid, request.amount, &actor).await?,
    ))
}

/// POST /api/rental_contract/:id/email
pub async fn send_summary(actor: Actor, Path(id): Path<String>) -> ApiResult<Json<SendEmailResponse>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a003_rental_contract::service::send_summary(uuid, &actor).await?))
}
