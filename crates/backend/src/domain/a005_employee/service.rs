use super::repository;
use contracts::domain::a005_employee::{Employee, EmployeeDto, PayrollSummary};
use contracts::domain::common::AggregateRoot;
use contracts::shared::duplicates::{conflict_message, find_conflict_by, DuplicateKind};
use contracts::shared::list::{ListQuery, ListResponse};
use contracts::system::audit::AuditAction;
use uuid::Uuid;

use crate::domain::common::record_change;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::Actor;

fn collection() -> &'static str {
    Employee::collection_name()
}

async fn ensure_unique(aggregate: &Employee) -> anyhow::Result<()> {
    let existing = repository::list_all().await?;
    let unique = |kind: DuplicateKind| matches!(kind, DuplicateKind::Phone | DuplicateKind::NationalId);
    if let Some((kind, owner)) = find_conflict_by(&existing, aggregate, unique) {
        return Err(ServiceError::conflict(conflict_message(kind, &owner.base.description)));
    }
    Ok(())
}

/// Приём сотрудника
pub async fn create(dto: EmployeeDto, actor: &Actor) -> anyhow::Result<Uuid> {
    let mut aggregate = Employee::new_for_insert(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    record_change(
        actor,
        collection(),
        &id.to_string(),
        AuditAction::Create,
        Some(format!("{}, {}", aggregate.base.description, aggregate.position)),
    )
    .await;
    Ok(id)
}

pub async fn update(dto: EmployeeDto, actor: &Actor) -> anyhow::Result<()> {
    let raw_id = dto.id.clone().unwrap_or_default();
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", raw_id)))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Сотрудник", &raw_id))?;

    let previous_status = aggregate.status;
    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::validation)?;
    ensure_unique(&aggregate).await?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    if previous_status != aggregate.status {
        record_change(
            actor,
            collection(),
            &raw_id,
            AuditAction::StatusChange,
            Some(format!("{} → {}", previous_status.label(), aggregate.status.label())),
        )
        .await;
    } else {
        record_change(actor, collection(), &raw_id, AuditAction::Update, None).await;
    }
    Ok(())
}

pub async fn delete(id: Uuid, actor: &Actor) -> anyhow::Result<bool> {
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        record_change(actor, collection(), &id.to_string(), AuditAction::Delete, None).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Employee>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Employee>> {
    repository::list_all().await
}

pub async fn list(query: &ListQuery) -> anyhow::Result<ListResponse<Employee>> {
    let items = repository::list_all().await?;
    Ok(query.apply(items, |e| {
        vec![
            e.base.code.clone(),
            e.base.description.clone(),
            e.position.clone(),
            e.department.clone(),
            e.phone.clone(),
        ]
    }))
}

/// Месячный фонд оплаты труда по отделам
pub async fn payroll_summary() -> anyhow::Result<PayrollSummary> {
    let employees = repository::list_all().await?;
    Ok(PayrollSummary::from_employees(&employees))
}
