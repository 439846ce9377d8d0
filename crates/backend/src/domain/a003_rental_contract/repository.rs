use chrono::{NaiveDate, Utc};
use contracts::domain::a001_customer::CustomerId;
use contracts::domain::a002_vehicle::VehicleId;
use contracts::domain::a003_rental_contract::{ContractStatus, RentalContract, RentalContractId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_rental_contract")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub vehicle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_rate: f64,
    pub total_amount: f64,
    pub deposit: f64,
    pub paid_amount: f64,
    pub status: String,
    pub start_mileage: i64,
    pub end_mileage: Option<i64>,
    pub returned_at: Option<NaiveDate>,
    pub late_fee: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_uuid(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::nil())
}

impl From<Model> for RentalContract {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        RentalContract {
            base: BaseAggregate::with_metadata(
                RentalContractId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            customer_id: CustomerId(parse_uuid(&m.customer_id)),
            vehicle_id: VehicleId(parse_uuid(&m.vehicle_id)),
            start_date: m.start_date,
            end_date: m.end_date,
            daily_rate: m.daily_rate,
            total_amount: m.total_amount,
            deposit: m.deposit,
            paid_amount: m.paid_amount,
            status: m.status.parse().unwrap_or_default(),
            start_mileage: m.start_mileage,
            end_mileage: m.end_mileage,
            returned_at: m.returned_at,
            late_fee: m.late_fee,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn active_model(aggregate: &RentalContract) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id.value().to_string()),
        vehicle_id: Set(aggregate.vehicle_id.value().to_string()),
        start_date: Set(aggregate.start_date),
        end_date: Set(aggregate.end_date),
        daily_rate: Set(aggregate.daily_rate),
        total_amount: Set(aggregate.total_amount),
        deposit: Set(aggregate.deposit),
        paid_amount: Set(aggregate.paid_amount),
        status: Set(aggregate.status.as_str().to_string()),
        start_mileage: Set(aggregate.start_mileage),
        end_mileage: Set(aggregate.end_mileage),
        returned_at: Set(aggregate.returned_at),
        late_fee: Set(aggregate.late_fee),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Договоры, новые первыми. `status` сужает выборку.
pub async fn list_all(status: Option<ContractStatus>) -> anyhow::Result<Vec<RentalContract>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    Ok(query
        .order_by_desc(Column::StartDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn list_active() -> anyhow::Result<Vec<RentalContract>> {
    list_all(Some(ContractStatus::Active)).await
}

/// Договоры, пересекающиеся с периодом [from, to] (кроме отменённых)
pub async fn list_overlapping(from: NaiveDate, to: NaiveDate) -> anyhow::Result<Vec<RentalContract>> {
    Ok(Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.ne(ContractStatus::Cancelled.as_str()))
        .filter(Column::StartDate.lte(to))
        .all(conn())
        .await?
        .into_iter()
        .map(RentalContract::from)
        .filter(|c| c.returned_at.unwrap_or(c.end_date) >= from)
        .collect())
}

/// Действующие договоры по автомобилю
pub async fn active_for_vehicle<C: ConnectionTrait>(
    db: &C,
    vehicle_id: Uuid,
) -> anyhow::Result<Vec<RentalContract>> {
    Ok(Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::VehicleId.eq(vehicle_id.to_string()))
        .filter(Column::Status.eq(ContractStatus::Active.as_str()))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<RentalContract>> {
    get_by_id_with(conn(), id).await
}

pub async fn get_by_id_with<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> anyhow::Result<Option<RentalContract>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert_with<C: ConnectionTrait>(db: &C, aggregate: &RentalContract) -> anyhow::Result<Uuid> {
    active_model(aggregate).insert(db).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &RentalContract) -> anyhow::Result<()> {
    update_with(conn(), aggregate).await
}

pub async fn update_with<C: ConnectionTrait>(db: &C, aggregate: &RentalContract) -> anyhow::Result<()> {
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
