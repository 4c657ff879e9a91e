use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle status, stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// SeaORM entity for the `orders` table.
///
/// A client may hold at most one active (pending or accepted) order per
/// service; the partial unique index `idx_orders_service_client_active`
/// enforces this at the store level while still allowing re-ordering after
/// a rejection.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub duration_in_days: i32,
    pub status: OrderStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub service_id: Uuid,
    pub comment: Option<String>,
    pub duration_in_days: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrder {
    pub comment: Option<String>,
    pub duration_in_days: Option<i32>,
}
