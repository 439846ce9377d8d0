use chrono::{NaiveDate, Utc};
use contracts::domain::a005_employee::{Employee, EmployeeId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub position: String,
    pub department: String,
    pub phone: String,
    pub national_id: String,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub status: String,
    pub termination_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Employee {
            base: BaseAggregate::with_metadata(
                EmployeeId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            position: m.position,
            department: m.department,
            phone: m.phone,
            national_id: m.national_id,
            email: m.email,
            hire_date: m.hire_date,
            salary: m.salary,
            status: m.status.parse().unwrap_or_default(),
            termination_date: m.termination_date,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &Employee) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        position: Set(aggregate.position.clone()),
        department: Set(aggregate.department.clone()),
        phone: Set(aggregate.phone.clone()),
        national_id: Set(aggregate.national_id.clone()),
        email: Set(aggregate.email.clone()),
        hire_date: Set(aggregate.hire_date),
        salary: Set(aggregate.salary),
        status: Set(aggregate.status.as_str().to_string()),
        termination_date: Set(aggregate.termination_date),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Employee>> {
    Ok(Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Department)
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Employee>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Employee) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Employee) -> anyhow::Result<()> {
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
