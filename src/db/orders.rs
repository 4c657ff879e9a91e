use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::orders::{self, CreateOrder, OrderStatus, UpdateOrder};

/// Insert a new order (defaults to Pending status).
pub async fn insert_order<C: ConnectionTrait>(
    db: &C,
    input: CreateOrder,
    client_id: Uuid,
) -> Result<orders::Model, DbErr> {
    let new_order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(input.service_id),
        client_id: Set(client_id),
        comment: Set(input.comment),
        duration_in_days: Set(input.duration_in_days),
        status: Set(OrderStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_order.insert(db).await
}

/// Fetch a single order by ID.
pub async fn get_order_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id).one(db).await
}

/// Fetch all orders on a service.
pub async fn get_orders_by_service<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .filter(orders::Column::ServiceId.eq(service_id))
        .all(db)
        .await
}

/// Fetch all orders placed by a client, newest first.
pub async fn get_orders_by_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .filter(orders::Column::ClientId.eq(client_id))
        .order_by_desc(orders::Column::CreatedAt)
        .all(db)
        .await
}

/// Whether the client already has an active (pending or accepted) order on
/// this service.
pub async fn active_order_exists<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    client_id: Uuid,
) -> Result<bool, DbErr> {
    let count = orders::Entity::find()
        .filter(orders::Column::ServiceId.eq(service_id))
        .filter(orders::Column::ClientId.eq(client_id))
        .filter(
            orders::Column::Status.is_in([OrderStatus::Pending, OrderStatus::Accepted]),
        )
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Update an order's editable fields (comment/duration).
pub async fn update_order<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
    input: UpdateOrder,
) -> Result<orders::Model, DbErr> {
    let mut active: orders::ActiveModel = order.into();

    if let Some(comment) = input.comment {
        active.comment = Set(Some(comment));
    }
    if let Some(duration) = input.duration_in_days {
        active.duration_in_days = Set(duration);
    }

    active.update(db).await
}

/// Set the status of a single order.
pub async fn set_order_status<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
    status: OrderStatus,
) -> Result<orders::Model, DbErr> {
    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    active.update(db).await
}

/// Bulk-reject the given orders in one statement.
pub async fn reject_orders<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = orders::Entity::update_many()
        .col_expr(orders::Column::Status, Expr::value(OrderStatus::Rejected))
        .filter(orders::Column::Id.is_in(ids.to_vec()))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete an order by ID.
pub async fn delete_order<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    orders::Entity::delete_by_id(id).exec(db).await
}
