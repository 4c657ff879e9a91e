use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, BidStatus, CreateBid, UpdateBid};

/// Insert a new bid (defaults to Pending status).
pub async fn insert_bid<C: ConnectionTrait>(
    db: &C,
    input: CreateBid,
    freelancer_id: Uuid,
) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(input.project_id),
        freelancer_id: Set(freelancer_id),
        amount: Set(input.amount),
        comment: Set(input.comment),
        duration_in_days: Set(input.duration_in_days),
        status: Set(BidStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch all bids on a project.
pub async fn get_bids_by_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::ProjectId.eq(project_id))
        .all(db)
        .await
}

/// Fetch all bids submitted by a freelancer, newest first.
pub async fn get_bids_by_freelancer<C: ConnectionTrait>(
    db: &C,
    freelancer_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Whether the freelancer already has a bid on this project.
pub async fn bid_exists<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    freelancer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = bids::Entity::find()
        .filter(bids::Column::ProjectId.eq(project_id))
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Update a bid's editable fields (amount/comment/duration).
pub async fn update_bid<C: ConnectionTrait>(
    db: &C,
    bid: bids::Model,
    input: UpdateBid,
) -> Result<bids::Model, DbErr> {
    let mut active: bids::ActiveModel = bid.into();

    if let Some(amount) = input.amount {
        active.amount = Set(amount);
    }
    if let Some(comment) = input.comment {
        active.comment = Set(Some(comment));
    }
    if let Some(duration) = input.duration_in_days {
        active.duration_in_days = Set(duration);
    }

    active.update(db).await
}

/// Set the status of a single bid.
pub async fn set_bid_status<C: ConnectionTrait>(
    db: &C,
    bid: bids::Model,
    status: BidStatus,
) -> Result<bids::Model, DbErr> {
    let mut active: bids::ActiveModel = bid.into();
    active.status = Set(status);
    active.update(db).await
}

/// Bulk-reject the given bids in one statement.
pub async fn reject_bids<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
        .filter(bids::Column::Id.is_in(ids.to_vec()))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete a bid by ID.
pub async fn delete_bid<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    bids::Entity::delete_by_id(id).exec(db).await
}
