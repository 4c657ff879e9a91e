//! Transactional lifecycle operations for Project/Bid and Service/Order.
//!
//! Every public function here is one atomic unit against the store: it opens
//! a serializable transaction, re-fetches the aggregate it is about to
//! mutate, validates the transition against [`super::transitions`], applies
//! the cascade, and commits. A concurrent reader never observes a partially
//! applied cascade, and a stale read can never silently win — the store
//! aborts one of two racing transactions, which we retry once before
//! surfacing `Conflict`.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::db::{
    bids as bid_db, chats as chat_db, orders as order_db, projects as project_db,
    services as service_db,
};
use crate::engine::error::EngineError;
use crate::engine::transitions;
use crate::models::bids::{self, BidStatus, CreateBid, UpdateBid};
use crate::models::chats;
use crate::models::orders::{self, CreateOrder, OrderStatus, UpdateOrder};
use crate::models::projects::{self, ProjectStatus};
use crate::models::services::{self, ServiceStatus};

/// Result of accepting a bid: the updated aggregate plus the chat the
/// matched pair can now talk in.
#[derive(Debug)]
pub struct AcceptBidOutcome {
    pub project: projects::Model,
    pub bid: bids::Model,
    pub chat: chats::Model,
    pub chat_created: bool,
}

/// Result of accepting an order; mirrors [`AcceptBidOutcome`].
#[derive(Debug)]
pub struct AcceptOrderOutcome {
    pub service: services::Model,
    pub order: orders::Model,
    pub chat: chats::Model,
    pub chat_created: bool,
}

/// Retry the operation once when the store reports a serialization or
/// deadlock conflict; a second failure surfaces as `Conflict`.
macro_rules! with_serialization_retry {
    ($op:expr) => {{
        match $op {
            Err(EngineError::Database(e)) if EngineError::is_serialization_conflict(&e) => {
                match $op {
                    Err(EngineError::Database(e))
                        if EngineError::is_serialization_conflict(&e) =>
                    {
                        Err(EngineError::conflict(
                            "concurrent update on the same resource, please retry",
                        ))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }};
}

async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, EngineError> {
    Ok(db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?)
}

/// Find-or-create the chat for a matched (client, freelancer) pair.
///
/// Keyed by the pair's unique index; a lost creation race degrades to a
/// re-read, so the chat is created at most once platform-wide.
async fn ensure_chat(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    freelancer_id: Uuid,
) -> Result<(chats::Model, bool), EngineError> {
    if let Some(chat) = chat_db::get_chat_by_pair(txn, client_id, freelancer_id).await? {
        return Ok((chat, false));
    }

    match chat_db::insert_chat(txn, client_id, freelancer_id).await {
        Ok(chat) => Ok((chat, true)),
        Err(e) if EngineError::is_unique_violation(&e) => {
            let chat = chat_db::get_chat_by_pair(txn, client_id, freelancer_id)
                .await?
                .ok_or(EngineError::Database(e))?;
            Ok((chat, false))
        }
        Err(e) => Err(e.into()),
    }
}

// ── Project / Bid ──

/// Submit a bid on a project. One bid per (project, freelancer), ever.
pub async fn create_bid(
    db: &DatabaseConnection,
    input: CreateBid,
    freelancer_id: Uuid,
) -> Result<bids::Model, EngineError> {
    with_serialization_retry!(create_bid_tx(db, input.clone(), freelancer_id).await)
}

async fn create_bid_tx(
    db: &DatabaseConnection,
    input: CreateBid,
    freelancer_id: Uuid,
) -> Result<bids::Model, EngineError> {
    let txn = begin(db).await?;

    project_db::get_project_by_id(&txn, input.project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if bid_db::bid_exists(&txn, input.project_id, freelancer_id).await? {
        return Err(EngineError::conflict(
            "you have already submitted a bid on this project",
        ));
    }

    // The unique index backs up the pre-check under concurrency.
    let bid = match bid_db::insert_bid(&txn, input, freelancer_id).await {
        Ok(bid) => bid,
        Err(e) if EngineError::is_unique_violation(&e) => {
            return Err(EngineError::conflict(
                "you have already submitted a bid on this project",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;
    Ok(bid)
}

/// Accept one bid: the winner goes `Accepted`, every still-pending sibling is
/// rejected in the same transaction, the project moves to `InProgress` and a
/// chat for the matched pair is ensured. Re-invoking with the same bid is a
/// no-op for the siblings.
pub async fn accept_bid(
    db: &DatabaseConnection,
    project_id: Uuid,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<AcceptBidOutcome, EngineError> {
    with_serialization_retry!(accept_bid_tx(db, project_id, bid_id, acting_user).await)
}

async fn accept_bid_tx(
    db: &DatabaseConnection,
    project_id: Uuid,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<AcceptBidOutcome, EngineError> {
    let txn = begin(db).await?;

    let project = project_db::get_project_by_id(&txn, project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != acting_user {
        return Err(EngineError::forbidden(
            "only the project owner can accept bids",
        ));
    }

    let all_bids = bid_db::get_bids_by_project(&txn, project_id).await?;
    let bid = all_bids
        .iter()
        .find(|b| b.id == bid_id)
        .cloned()
        .ok_or_else(|| EngineError::not_found("bid not found on this project"))?;

    if !transitions::project_accepts_bids(project.status) {
        return Err(EngineError::invalid_state(
            "the project is no longer accepting bids",
        ));
    }
    if !transitions::bid_can_accept(bid.status) {
        return Err(EngineError::invalid_state("the bid was already rejected"));
    }
    if all_bids
        .iter()
        .any(|b| b.id != bid_id && b.status == BidStatus::Accepted)
    {
        return Err(EngineError::invalid_state(
            "another bid was already accepted for this project",
        ));
    }

    let statuses: Vec<(Uuid, BidStatus)> = all_bids.iter().map(|b| (b.id, b.status)).collect();
    let to_reject = transitions::bids_rejected_on_accept(&statuses, bid_id);
    bid_db::reject_bids(&txn, &to_reject).await?;

    let bid = bid_db::set_bid_status(&txn, bid, BidStatus::Accepted).await?;

    let mut active: projects::ActiveModel = project.into();
    active.status = Set(ProjectStatus::InProgress);
    active.selected_freelancer_id = Set(Some(bid.freelancer_id));
    let project = active.update(&txn).await?;

    let (chat, chat_created) = ensure_chat(&txn, project.client_id, bid.freelancer_id).await?;

    txn.commit().await?;
    info!(
        project_id = %project.id,
        bid_id = %bid.id,
        rejected = to_reject.len(),
        "bid accepted"
    );
    Ok(AcceptBidOutcome {
        project,
        bid,
        chat,
        chat_created,
    })
}

/// Reject a bid. Deliberately has no status guard: rejecting an accepted bid
/// is allowed and leaves the project untouched.
pub async fn reject_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<bids::Model, EngineError> {
    with_serialization_retry!(reject_bid_tx(db, bid_id, acting_user).await)
}

async fn reject_bid_tx(
    db: &DatabaseConnection,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<bids::Model, EngineError> {
    let txn = begin(db).await?;

    let bid = bid_db::get_bid_by_id(&txn, bid_id)
        .await?
        .ok_or_else(|| EngineError::not_found("bid not found"))?;

    let project = project_db::get_project_by_id(&txn, bid.project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != acting_user {
        return Err(EngineError::forbidden(
            "only the project owner can reject bids",
        ));
    }

    let bid = bid_db::set_bid_status(&txn, bid, BidStatus::Rejected).await?;
    txn.commit().await?;
    Ok(bid)
}

/// Cancel an open project. Every bid on it — whatever its status — is
/// rejected in the same transaction.
pub async fn cancel_project(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    with_serialization_retry!(cancel_project_tx(db, project_id, acting_user).await)
}

async fn cancel_project_tx(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    let txn = begin(db).await?;

    let project = project_db::get_project_by_id(&txn, project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != acting_user {
        return Err(EngineError::forbidden(
            "only the project owner can cancel it",
        ));
    }
    if !transitions::project_can_cancel(project.status) {
        return Err(EngineError::invalid_state(
            "only an open project can be cancelled",
        ));
    }

    let all_bids = bid_db::get_bids_by_project(&txn, project_id).await?;
    let statuses: Vec<(Uuid, BidStatus)> = all_bids.iter().map(|b| (b.id, b.status)).collect();
    let to_reject = transitions::bids_rejected_on_cancel(&statuses);
    bid_db::reject_bids(&txn, &to_reject).await?;

    let mut active: projects::ActiveModel = project.into();
    active.status = Set(ProjectStatus::Cancelled);
    let project = active.update(&txn).await?;

    txn.commit().await?;
    info!(project_id = %project.id, rejected = to_reject.len(), "project cancelled");
    Ok(project)
}

/// Re-open a cancelled project. Rejected bids stay rejected.
pub async fn resume_project(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    with_serialization_retry!(resume_project_tx(db, project_id, acting_user).await)
}

async fn resume_project_tx(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    let txn = begin(db).await?;

    let project = project_db::get_project_by_id(&txn, project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != acting_user {
        return Err(EngineError::forbidden(
            "only the project owner can resume it",
        ));
    }
    if !transitions::project_can_resume(project.status) {
        return Err(EngineError::invalid_state(
            "only a cancelled project can be resumed",
        ));
    }

    let mut active: projects::ActiveModel = project.into();
    active.status = Set(ProjectStatus::Open);
    let project = active.update(&txn).await?;

    txn.commit().await?;
    Ok(project)
}

/// The selected freelancer marks the project as done.
pub async fn complete_project(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    with_serialization_retry!(complete_project_tx(db, project_id, acting_user).await)
}

async fn complete_project_tx(
    db: &DatabaseConnection,
    project_id: Uuid,
    acting_user: Uuid,
) -> Result<projects::Model, EngineError> {
    let txn = begin(db).await?;

    let project = project_db::get_project_by_id(&txn, project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.selected_freelancer_id != Some(acting_user) {
        return Err(EngineError::forbidden(
            "only the selected freelancer can complete the project",
        ));
    }
    if !transitions::project_can_complete(project.status) {
        return Err(EngineError::invalid_state(
            "the project is not in a completable state",
        ));
    }

    let mut active: projects::ActiveModel = project.into();
    active.status = Set(ProjectStatus::Completed);
    let project = active.update(&txn).await?;

    txn.commit().await?;
    info!(project_id = %project.id, "project completed");
    Ok(project)
}

// ── Service / Order ──

/// Place an order on a service. One active (pending/accepted) order per
/// (service, client) at a time; re-ordering after a rejection is fine.
pub async fn create_order(
    db: &DatabaseConnection,
    input: CreateOrder,
    client_id: Uuid,
) -> Result<orders::Model, EngineError> {
    with_serialization_retry!(create_order_tx(db, input.clone(), client_id).await)
}

async fn create_order_tx(
    db: &DatabaseConnection,
    input: CreateOrder,
    client_id: Uuid,
) -> Result<orders::Model, EngineError> {
    let txn = begin(db).await?;

    service_db::get_service_by_id(&txn, input.service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if order_db::active_order_exists(&txn, input.service_id, client_id).await? {
        return Err(EngineError::conflict(
            "you already have an active order on this service",
        ));
    }

    let order = match order_db::insert_order(&txn, input, client_id).await {
        Ok(order) => order,
        Err(e) if EngineError::is_unique_violation(&e) => {
            return Err(EngineError::conflict(
                "you already have an active order on this service",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;
    Ok(order)
}

/// Accept one order on a service. Every sibling that has not already reached
/// `Completed` is rejected — including a previously accepted one, which this
/// displaces. The chat for the matched pair is ensured in the same
/// transaction.
pub async fn accept_order(
    db: &DatabaseConnection,
    service_id: Uuid,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<AcceptOrderOutcome, EngineError> {
    with_serialization_retry!(accept_order_tx(db, service_id, order_id, acting_user).await)
}

async fn accept_order_tx(
    db: &DatabaseConnection,
    service_id: Uuid,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<AcceptOrderOutcome, EngineError> {
    let txn = begin(db).await?;

    let service = service_db::get_service_by_id(&txn, service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != acting_user {
        return Err(EngineError::forbidden(
            "only the service owner can accept orders",
        ));
    }

    let all_orders = order_db::get_orders_by_service(&txn, service_id).await?;
    let order = all_orders
        .iter()
        .find(|o| o.id == order_id)
        .cloned()
        .ok_or_else(|| EngineError::not_found("order not found on this service"))?;

    if !transitions::order_can_accept(order.status) {
        return Err(EngineError::invalid_state(
            "the order can no longer be accepted",
        ));
    }

    let statuses: Vec<(Uuid, OrderStatus)> = all_orders.iter().map(|o| (o.id, o.status)).collect();
    let to_reject = transitions::orders_rejected_on_accept(&statuses, order_id);
    order_db::reject_orders(&txn, &to_reject).await?;

    let order = order_db::set_order_status(&txn, order, OrderStatus::Accepted).await?;

    let mut active: services::ActiveModel = service.into();
    active.selected_client_id = Set(Some(order.client_id));
    let service = active.update(&txn).await?;

    let (chat, chat_created) = ensure_chat(&txn, order.client_id, service.freelancer_id).await?;

    txn.commit().await?;
    info!(
        service_id = %service.id,
        order_id = %order.id,
        rejected = to_reject.len(),
        "order accepted"
    );
    Ok(AcceptOrderOutcome {
        service,
        order,
        chat,
        chat_created,
    })
}

/// Reject an order. Like bid rejection, this has no status guard.
pub async fn reject_order(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    with_serialization_retry!(reject_order_tx(db, order_id, acting_user).await)
}

async fn reject_order_tx(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    let txn = begin(db).await?;

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| EngineError::not_found("order not found"))?;

    let service = service_db::get_service_by_id(&txn, order.service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != acting_user {
        return Err(EngineError::forbidden(
            "only the service owner can reject orders",
        ));
    }

    let order = order_db::set_order_status(&txn, order, OrderStatus::Rejected).await?;
    txn.commit().await?;
    Ok(order)
}

/// Take a service off the market. Pending orders are rejected; accepted and
/// completed engagements are left alone.
pub async fn cancel_service(
    db: &DatabaseConnection,
    service_id: Uuid,
    acting_user: Uuid,
) -> Result<services::Model, EngineError> {
    with_serialization_retry!(cancel_service_tx(db, service_id, acting_user).await)
}

async fn cancel_service_tx(
    db: &DatabaseConnection,
    service_id: Uuid,
    acting_user: Uuid,
) -> Result<services::Model, EngineError> {
    let txn = begin(db).await?;

    let service = service_db::get_service_by_id(&txn, service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != acting_user {
        return Err(EngineError::forbidden(
            "only the service owner can cancel it",
        ));
    }
    if !transitions::service_can_cancel(service.status) {
        return Err(EngineError::invalid_state(
            "only an available service can be cancelled",
        ));
    }

    let all_orders = order_db::get_orders_by_service(&txn, service_id).await?;
    let statuses: Vec<(Uuid, OrderStatus)> = all_orders.iter().map(|o| (o.id, o.status)).collect();
    let to_reject = transitions::orders_rejected_on_cancel(&statuses);
    order_db::reject_orders(&txn, &to_reject).await?;

    let mut active: services::ActiveModel = service.into();
    active.status = Set(ServiceStatus::Unavailable);
    let service = active.update(&txn).await?;

    txn.commit().await?;
    info!(service_id = %service.id, rejected = to_reject.len(), "service cancelled");
    Ok(service)
}

/// Put a cancelled service back on the market.
pub async fn resume_service(
    db: &DatabaseConnection,
    service_id: Uuid,
    acting_user: Uuid,
) -> Result<services::Model, EngineError> {
    with_serialization_retry!(resume_service_tx(db, service_id, acting_user).await)
}

async fn resume_service_tx(
    db: &DatabaseConnection,
    service_id: Uuid,
    acting_user: Uuid,
) -> Result<services::Model, EngineError> {
    let txn = begin(db).await?;

    let service = service_db::get_service_by_id(&txn, service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != acting_user {
        return Err(EngineError::forbidden(
            "only the service owner can resume it",
        ));
    }
    if !transitions::service_can_resume(service.status) {
        return Err(EngineError::invalid_state(
            "only an unavailable service can be resumed",
        ));
    }

    let mut active: services::ActiveModel = service.into();
    active.status = Set(ServiceStatus::Available);
    let service = active.update(&txn).await?;

    txn.commit().await?;
    Ok(service)
}

/// The client signs off on a delivered order.
pub async fn complete_order(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    with_serialization_retry!(complete_order_tx(db, order_id, acting_user).await)
}

async fn complete_order_tx(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    let txn = begin(db).await?;

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| EngineError::not_found("order not found"))?;

    if order.client_id != acting_user {
        return Err(EngineError::forbidden(
            "only the ordering client can complete the order",
        ));
    }
    if !transitions::order_can_complete(order.status) {
        return Err(EngineError::invalid_state(
            "the order is not in a completable state",
        ));
    }

    let order = order_db::set_order_status(&txn, order, OrderStatus::Completed).await?;
    txn.commit().await?;
    info!(order_id = %order.id, "order completed");
    Ok(order)
}

// ── Pending-only edits by the submitting party ──

/// A freelancer may edit their bid only while it is pending.
pub async fn update_own_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
    input: UpdateBid,
    acting_user: Uuid,
) -> Result<bids::Model, EngineError> {
    with_serialization_retry!(update_own_bid_tx(db, bid_id, input.clone(), acting_user).await)
}

async fn update_own_bid_tx(
    db: &DatabaseConnection,
    bid_id: Uuid,
    input: UpdateBid,
    acting_user: Uuid,
) -> Result<bids::Model, EngineError> {
    let txn = begin(db).await?;

    let bid = bid_db::get_bid_by_id(&txn, bid_id)
        .await?
        .ok_or_else(|| EngineError::not_found("bid not found"))?;

    if bid.freelancer_id != acting_user {
        return Err(EngineError::forbidden("you can only edit your own bids"));
    }
    if bid.status != BidStatus::Pending {
        return Err(EngineError::invalid_state(
            "only a pending bid can be edited",
        ));
    }

    let bid = bid_db::update_bid(&txn, bid, input).await?;
    txn.commit().await?;
    Ok(bid)
}

/// A freelancer may withdraw their bid only while it is pending.
pub async fn withdraw_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<(), EngineError> {
    with_serialization_retry!(withdraw_bid_tx(db, bid_id, acting_user).await)
}

async fn withdraw_bid_tx(
    db: &DatabaseConnection,
    bid_id: Uuid,
    acting_user: Uuid,
) -> Result<(), EngineError> {
    let txn = begin(db).await?;

    let bid = bid_db::get_bid_by_id(&txn, bid_id)
        .await?
        .ok_or_else(|| EngineError::not_found("bid not found"))?;

    if bid.freelancer_id != acting_user {
        return Err(EngineError::forbidden("you can only withdraw your own bids"));
    }
    if bid.status != BidStatus::Pending {
        return Err(EngineError::invalid_state(
            "only a pending bid can be withdrawn",
        ));
    }

    bid_db::delete_bid(&txn, bid_id).await?;
    txn.commit().await?;
    Ok(())
}

/// A client may edit their order only while it is pending.
pub async fn update_own_order(
    db: &DatabaseConnection,
    order_id: Uuid,
    input: UpdateOrder,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    with_serialization_retry!(update_own_order_tx(db, order_id, input.clone(), acting_user).await)
}

async fn update_own_order_tx(
    db: &DatabaseConnection,
    order_id: Uuid,
    input: UpdateOrder,
    acting_user: Uuid,
) -> Result<orders::Model, EngineError> {
    let txn = begin(db).await?;

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| EngineError::not_found("order not found"))?;

    if order.client_id != acting_user {
        return Err(EngineError::forbidden("you can only edit your own orders"));
    }
    if order.status != OrderStatus::Pending {
        return Err(EngineError::invalid_state(
            "only a pending order can be edited",
        ));
    }

    let order = order_db::update_order(&txn, order, input).await?;
    txn.commit().await?;
    Ok(order)
}

/// A client may withdraw their order only while it is pending.
pub async fn withdraw_order(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<(), EngineError> {
    with_serialization_retry!(withdraw_order_tx(db, order_id, acting_user).await)
}

async fn withdraw_order_tx(
    db: &DatabaseConnection,
    order_id: Uuid,
    acting_user: Uuid,
) -> Result<(), EngineError> {
    let txn = begin(db).await?;

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| EngineError::not_found("order not found"))?;

    if order.client_id != acting_user {
        return Err(EngineError::forbidden(
            "you can only withdraw your own orders",
        ));
    }
    if order.status != OrderStatus::Pending {
        return Err(EngineError::invalid_state(
            "only a pending order can be withdrawn",
        ));
    }

    order_db::delete_order(&txn, order_id).await?;
    txn.commit().await?;
    Ok(())
}
