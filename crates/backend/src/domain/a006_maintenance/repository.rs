use chrono::{NaiveDate, Utc};
use contracts::domain::a002_vehicle::VehicleId;
use contracts::domain::a006_maintenance::{MaintenanceId, MaintenanceRecord};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_maintenance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub vehicle_id: String,
    pub service_date: NaiveDate,
    pub kind: String,
    pub cost: f64,
    pub mileage: i64,
    pub vendor: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MaintenanceRecord {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let vehicle_uuid = Uuid::parse_str(&m.vehicle_id).unwrap_or_default();

        MaintenanceRecord {
            base: BaseAggregate::with_metadata(
                MaintenanceId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            vehicle_id: VehicleId(vehicle_uuid),
            service_date: m.service_date,
            kind: m.kind.parse().unwrap_or_default(),
            cost: m.cost,
            mileage: m.mileage,
            vendor: m.vendor,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &MaintenanceRecord) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        vehicle_id: Set(aggregate.vehicle_id.value().to_string()),
        service_date: Set(aggregate.service_date),
        kind: Set(aggregate.kind.as_str().to_string()),
        cost: Set(aggregate.cost),
        mileage: Set(aggregate.mileage),
        vendor: Set(aggregate.vendor.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Записи обслуживания, новые первыми. `vehicle_id` ограничивает одним автомобилем.
pub async fn list(vehicle_id: Option<Uuid>) -> anyhow::Result<Vec<MaintenanceRecord>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(vehicle_id) = vehicle_id {
        query = query.filter(Column::VehicleId.eq(vehicle_id.to_string()));
    }
    Ok(query
        .order_by_desc(Column::ServiceDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<MaintenanceRecord>> {
    get_by_id_with(conn(), id).await
}

pub async fn get_by_id_with<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Option<MaintenanceRecord>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert_with<C: ConnectionTrait>(db: &C, aggregate: &MaintenanceRecord) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(db).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update_with<C: ConnectionTrait>(db: &C, aggregate: &MaintenanceRecord) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn soft_delete_with<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
