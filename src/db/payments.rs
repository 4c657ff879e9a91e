use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::payments::{self, OwnerKind, PaymentStatus};

/// Parameters for inserting a new pending payment row.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub owner: OwnerKind,
    pub owner_id: Uuid,
    pub payer_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub provider: String,
}

/// Insert a payment in Pending status; the provider session id is attached
/// later, once the checkout session has actually been created.
pub async fn insert_payment<C: ConnectionTrait>(
    db: &C,
    input: NewPayment,
) -> Result<payments::Model, DbErr> {
    let now = chrono::Utc::now();
    let (order_id, project_id) = match input.owner {
        OwnerKind::Order => (Some(input.owner_id), None),
        OwnerKind::Project => (None, Some(input.owner_id)),
    };

    let new_payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        project_id: Set(project_id),
        payer_id: Set(input.payer_id),
        amount_minor: Set(input.amount_minor),
        currency: Set(input.currency),
        status: Set(PaymentStatus::Pending),
        provider: Set(input.provider),
        provider_session_id: Set(None),
        provider_payment_intent_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_payment.insert(db).await
}

/// Fetch a single payment by ID.
pub async fn get_payment_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find_by_id(id).one(db).await
}

/// Find the payment a provider session belongs to.
pub async fn get_payment_by_session_id<C: ConnectionTrait>(
    db: &C,
    session_id: &str,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::ProviderSessionId.eq(session_id))
        .one(db)
        .await
}

/// The most recent payment created for an order or project.
pub async fn latest_payment_for_owner<C: ConnectionTrait>(
    db: &C,
    owner: OwnerKind,
    owner_id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    let query = match owner {
        OwnerKind::Order => {
            payments::Entity::find().filter(payments::Column::OrderId.eq(owner_id))
        }
        OwnerKind::Project => {
            payments::Entity::find().filter(payments::Column::ProjectId.eq(owner_id))
        }
    };

    query
        .order_by_desc(payments::Column::CreatedAt)
        .one(db)
        .await
}

/// All payments made by a payer, newest first.
pub async fn get_payments_by_payer<C: ConnectionTrait>(
    db: &C,
    payer_id: Uuid,
) -> Result<Vec<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::PayerId.eq(payer_id))
        .order_by_desc(payments::Column::CreatedAt)
        .all(db)
        .await
}

/// Pending payments created before `cutoff`, for the reconciliation sweep.
pub async fn get_stale_pending_payments<C: ConnectionTrait>(
    db: &C,
    cutoff: DateTime<Utc>,
) -> Result<Vec<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .filter(payments::Column::CreatedAt.lt(cutoff))
        .order_by_asc(payments::Column::CreatedAt)
        .all(db)
        .await
}

/// Record the provider session on a freshly created payment.
pub async fn set_provider_session<C: ConnectionTrait>(
    db: &C,
    payment: payments::Model,
    session_id: String,
) -> Result<payments::Model, DbErr> {
    let mut active: payments::ActiveModel = payment.into();
    active.provider_session_id = Set(Some(session_id));
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await
}

/// Move a payment to a new status, optionally recording the provider's
/// payment intent id.
pub async fn set_payment_status<C: ConnectionTrait>(
    db: &C,
    payment: payments::Model,
    status: PaymentStatus,
    payment_intent_id: Option<String>,
) -> Result<payments::Model, DbErr> {
    let mut active: payments::ActiveModel = payment.into();
    active.status = Set(status);
    if let Some(pi) = payment_intent_id {
        active.provider_payment_intent_id = Set(Some(pi));
    }
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await
}
