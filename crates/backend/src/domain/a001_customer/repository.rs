use chrono::{NaiveDate, Utc};
use contracts::domain::a001_customer::{Customer, CustomerId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub driver_license: String,
    pub license_expiry: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_blacklisted: bool,
    pub blacklist_reason: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Customer {
            base: BaseAggregate::with_metadata(
                CustomerId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            phone: m.phone,
            national_id: m.national_id,
            email: m.email,
            driver_license: m.driver_license,
            license_expiry: m.license_expiry,
            birth_date: m.birth_date,
            address: m.address,
            is_blacklisted: m.is_blacklisted,
            blacklist_reason: m.blacklist_reason,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &Customer) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        phone: Set(aggregate.phone.clone()),
        national_id: Set(aggregate.national_id.clone()),
        email: Set(aggregate.email.clone()),
        driver_license: Set(aggregate.driver_license.clone()),
        license_expiry: Set(aggregate.license_expiry),
        birth_date: Set(aggregate.birth_date),
        address: Set(aggregate.address.clone()),
        is_blacklisted: Set(aggregate.is_blacklisted),
        blacklist_reason: Set(aggregate.blacklist_reason.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    let mut items: Vec<Customer> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Customer>> {
    get_by_id_with(conn(), id).await
}

pub async fn get_by_id_with<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Клиенты по списку ID (включая удалённых, для подписей в списках договоров)
pub async fn get_many(ids: Vec<String>) -> anyhow::Result<Vec<Customer>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::Id.is_in(ids))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn insert(aggregate: &Customer) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Customer) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
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
