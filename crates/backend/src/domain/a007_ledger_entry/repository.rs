use chrono::{NaiveDate, Utc};
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerEntryId, LedgerKind};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_ledger_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub entry_date: NaiveDate,
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub tax_deductible: bool,
    pub reference: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LedgerEntry {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        LedgerEntry {
            base: BaseAggregate::with_metadata(
                LedgerEntryId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            entry_date: m.entry_date,
            kind: m.kind.parse().unwrap_or_default(),
            category: m.category,
            amount: m.amount,
            tax_deductible: m.tax_deductible,
            reference: m.reference,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &LedgerEntry) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        entry_date: Set(aggregate.entry_date),
        kind: Set(aggregate.kind.as_str().to_string()),
        category: Set(aggregate.category.clone()),
        amount: Set(aggregate.amount),
        tax_deductible: Set(aggregate.tax_deductible),
        reference: Set(aggregate.reference.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Проводки за период (границы включительно), новые первыми
pub async fn list_filtered(
    kind: Option<LedgerKind>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<Vec<LedgerEntry>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(kind) = kind {
        query = query.filter(Column::Kind.eq(kind.as_str()));
    }
    if let Some(from) = from {
        query = query.filter(Column::EntryDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(Column::EntryDate.lte(to));
    }
    Ok(query
        .order_by_desc(Column::EntryDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn list_all() -> anyhow::Result<Vec<LedgerEntry>> {
    list_filtered(None, None, None).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<LedgerEntry>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

/// Проводки, созданные операцией с указанным ID (договор, обслуживание)
pub async fn find_by_reference<C: ConnectionTrait>(db: &C, reference: &str) -> anyhow::Result<Vec<LedgerEntry>> {
    Ok(Entity::find()
        .filter(Column::Reference.eq(reference))
        .filter(Column::IsDeleted.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn insert(aggregate: &LedgerEntry) -> anyhow::Result<Uuid> {
    insert_with(conn(), aggregate).await
}

pub async fn insert_with<C: ConnectionTrait>(db: &C, aggregate: &LedgerEntry) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(db).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &LedgerEntry) -> anyhow::Result<()> {
    update_with(conn(), aggregate).await
}

pub async fn update_with<C: ConnectionTrait>(db: &C, aggregate: &LedgerEntry) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

/// Пометить удалёнными все проводки операции
pub async fn soft_delete_by_reference<C: ConnectionTrait>(db: &C, reference: &str) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Reference.eq(reference))
        .filter(Column::IsDeleted.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
