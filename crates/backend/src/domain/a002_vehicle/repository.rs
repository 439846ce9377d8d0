use chrono::{NaiveDate, Utc};
use contracts::domain::a002_vehicle::{Vehicle, VehicleId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_vehicle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Госномер
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub make: String,
    #[sea_orm(column_name = "model")]
    pub model_name: String,
    pub year: i32,
    pub color: Option<String>,
    pub vin: Option<String>,
    pub category: String,
    pub status: String,
    pub daily_rate: f64,
    pub mileage: i64,
    pub purchase_price: f64,
    pub purchase_date: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub registration_expiry: Option<NaiveDate>,
    pub next_service_mileage: Option<i64>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vehicle {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Vehicle {
            base: BaseAggregate::with_metadata(
                VehicleId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            make: m.make,
            model: m.model_name,
            year: m.year,
            color: m.color,
            vin: m.vin,
            category: m.category.parse().unwrap_or_default(),
            status: m.status.parse().unwrap_or_default(),
            daily_rate: m.daily_rate,
            mileage: m.mileage,
            purchase_price: m.purchase_price,
            purchase_date: m.purchase_date,
            insurance_expiry: m.insurance_expiry,
            registration_expiry: m.registration_expiry,
            next_service_mileage: m.next_service_mileage,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &Vehicle) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        make: Set(aggregate.make.clone()),
        model_name: Set(aggregate.model.clone()),
        year: Set(aggregate.year),
        color: Set(aggregate.color.clone()),
        vin: Set(aggregate.vin.clone()),
        category: Set(aggregate.category.as_str().to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        daily_rate: Set(aggregate.daily_rate),
        mileage: Set(aggregate.mileage),
        purchase_price: Set(aggregate.purchase_price),
        purchase_date: Set(aggregate.purchase_date),
        insurance_expiry: Set(aggregate.insurance_expiry),
        registration_expiry: Set(aggregate.registration_expiry),
        next_service_mileage: Set(aggregate.next_service_mileage),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Vehicle>> {
    let mut items: Vec<Vehicle> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Vehicle>> {
    get_by_id_with(conn(), id).await
}

pub async fn get_by_id_with<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Option<Vehicle>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Автомобили по списку ID (включая удалённые, для подписей в списках)
pub async fn get_many(ids: Vec<String>) -> anyhow::Result<Vec<Vehicle>> {
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

pub async fn insert(aggregate: &Vehicle) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Vehicle) -> anyhow::Result<()> {
    update_with(conn(), aggregate).await
}

pub async fn update_with<C: ConnectionTrait>(db: &C, aggregate: &Vehicle) -> anyhow::Result<()> {
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
