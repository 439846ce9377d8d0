use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerEntryDto, LedgerKind, LedgerSummary};
use contracts::shared::list::{ListQuery, ListResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a007_ledger_entry;
use crate::shared::error::{parse_uuid, ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub kind: Option<LedgerKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/ledger_entry?kind=Income&from=2025-01-01&to=2025-03-31
pub async fn list(Query(query): Query<LedgerQuery>) -> ApiResult<Json<Vec<LedgerEntry>>> {
    Ok(Json(
        a007_ledger_entry::service::list_filtered(query.kind, query.from, query.to).await?,
    ))
}

/// GET /api/ledger_entry/list?q=&limit=&offset=
pub async fn list_page(Query(query): Query<ListQuery>) -> ApiResult<Json<ListResponse<LedgerEntry>>> {
    Ok(Json(a007_ledger_entry::service::list(&query).await?))
}

/// GET /api/ledger_entry/summary?from=&to=
pub async fn summary(Query(query): Query<LedgerQuery>) -> ApiResult<Json<LedgerSummary>> {
    Ok(Json(a007_ledger_entry::service::summary(query.from, query.to).await?))
}

/// GET /api/ledger_entry/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<LedgerEntry>> {
    let uuid = parse_uuid(&id)?;
    let entry = a007_ledger_entry::service::get_by_id(uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found("Проводка", &id))?;
    Ok(Json(entry))
}

/// POST /api/ledger_entry
pub async fn upsert(actor: Actor, Json(dto): Json<LedgerEntryDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a007_ledger_entry::service::update(dto, &actor).await?;
            id
        }
        None => a007_ledger_entry::service::create(dto, &actor).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/ledger_entry/:id
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a007_ledger_entry::service::delete(uuid, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Проводка", &id).into())
    }
}
