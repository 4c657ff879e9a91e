use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status stored as a lowercase string in the database.
///
/// `Succeeded`, `Canceled` and `Failed` are terminal; a terminal payment is
/// never mutated again, no matter how often the provider callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "succeeded")]
    Succeeded,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// SeaORM entity for the `payments` table.
///
/// Exactly one of `order_id` / `project_id` is set — a payment settles either
/// a service order or a project engagement, never both.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub payer_id: Uuid,
    /// Amount in minor currency units (kopecks/cents), never a float.
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider: String,
    pub provider_session_id: Option<String>,
    pub provider_payment_intent_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PayerId",
        to = "super::users::Column::Id"
    )]
    Payer,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// The resource a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Order,
    Project,
}

/// Request body for `POST /api/payments/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub owner: OwnerKind,
    pub id: Uuid,
}

/// Query parameters for the anonymous success callback URL.
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// Query parameters for the anonymous cancel navigation URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelQuery {
    pub owner: OwnerKind,
    pub id: Uuid,
}

/// Response for a started checkout: the payer is redirected to `session_url`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub payment_id: Uuid,
    pub session_url: String,
}
