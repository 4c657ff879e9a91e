//! Pure transition rules for the matching engine.
//!
//! Every rule the transactional operations in [`super::matching`] and
//! [`super::settlement`] enforce lives here as a plain function over status
//! values, so the state machines can be exercised without a database.
//!
//! Two cascade planners exist on purpose and must not be unified: accepting a
//! bid rejects only the still-pending siblings, while accepting an order
//! rejects every sibling that has not already reached `Completed`.

use uuid::Uuid;

use crate::models::bids::BidStatus;
use crate::models::orders::OrderStatus;
use crate::models::payments::PaymentStatus;
use crate::models::projects::ProjectStatus;
use crate::models::services::ServiceStatus;

// ── Project ──

/// A bid can be accepted while the project is open, or re-accepted
/// idempotently once it is already in progress.
pub fn project_accepts_bids(status: ProjectStatus) -> bool {
    matches!(status, ProjectStatus::Open | ProjectStatus::InProgress)
}

pub fn project_can_cancel(status: ProjectStatus) -> bool {
    status == ProjectStatus::Open
}

pub fn project_can_resume(status: ProjectStatus) -> bool {
    status == ProjectStatus::Cancelled
}

/// Completion is reachable from `Paid` (the settled path) and from
/// `InProgress` (work delivered before the client paid).
pub fn project_can_complete(status: ProjectStatus) -> bool {
    matches!(status, ProjectStatus::Paid | ProjectStatus::InProgress)
}

/// Checkout may only start for the exact pre-payment status.
pub fn project_can_start_checkout(status: ProjectStatus) -> bool {
    status == ProjectStatus::InProgress
}

// ── Service ──

pub fn service_can_cancel(status: ServiceStatus) -> bool {
    status == ServiceStatus::Available
}

pub fn service_can_resume(status: ServiceStatus) -> bool {
    status == ServiceStatus::Unavailable
}

// ── Bid ──

/// The target of an accept: pending, or already accepted (idempotent).
pub fn bid_can_accept(status: BidStatus) -> bool {
    matches!(status, BidStatus::Pending | BidStatus::Accepted)
}

// ── Order ──

/// The target of an accept: pending, or already accepted (idempotent).
pub fn order_can_accept(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Accepted)
}

/// Mirror of [`project_can_complete`]: from `Paid`, or straight from
/// `Accepted` when the client signs off before paying.
pub fn order_can_complete(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Paid | OrderStatus::Accepted)
}

pub fn order_can_start_checkout(status: OrderStatus) -> bool {
    status == OrderStatus::Accepted
}

/// An order still counts against the one-active-order-per-client limit.
pub fn order_is_active(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Accepted)
}

// ── Payment ──

/// Terminal payments are never mutated again, no matter what the provider
/// reports on a repeated callback.
pub fn payment_is_terminal(status: PaymentStatus) -> bool {
    status != PaymentStatus::Pending
}

// ── Cascade planners ──

/// Sibling bids to reject when one bid is accepted: only the still-pending
/// ones. Already accepted/rejected siblings are left untouched, which makes
/// a repeated accept of the same bid a no-op.
pub fn bids_rejected_on_accept(bids: &[(Uuid, BidStatus)], accepted_id: Uuid) -> Vec<Uuid> {
    bids.iter()
        .filter(|(id, status)| *id != accepted_id && *status == BidStatus::Pending)
        .map(|(id, _)| *id)
        .collect()
}

/// Bids to reject when the project is cancelled: all of them, regardless of
/// current status.
pub fn bids_rejected_on_cancel(bids: &[(Uuid, BidStatus)]) -> Vec<Uuid> {
    bids.iter().map(|(id, _)| *id).collect()
}

/// Sibling orders to reject when one order is accepted. Unlike the bid
/// cascade this one skips orders that already reached `Completed`; rejecting
/// an already-rejected sibling again would be a no-op, so those are skipped
/// too.
pub fn orders_rejected_on_accept(orders: &[(Uuid, OrderStatus)], accepted_id: Uuid) -> Vec<Uuid> {
    orders
        .iter()
        .filter(|(id, status)| {
            *id != accepted_id
                && !matches!(status, OrderStatus::Completed | OrderStatus::Rejected)
        })
        .map(|(id, _)| *id)
        .collect()
}

/// Orders to reject when the service is cancelled: only the pending ones.
/// This deliberately differs from the project cancel cascade, which rejects
/// every bid regardless of status.
pub fn orders_rejected_on_cancel(orders: &[(Uuid, OrderStatus)]) -> Vec<Uuid> {
    orders
        .iter()
        .filter(|(_, status)| *status == OrderStatus::Pending)
        .map(|(id, _)| *id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn project_lifecycle_guards() {
        assert!(project_accepts_bids(ProjectStatus::Open));
        assert!(project_accepts_bids(ProjectStatus::InProgress));
        assert!(!project_accepts_bids(ProjectStatus::Cancelled));
        assert!(!project_accepts_bids(ProjectStatus::Completed));

        assert!(project_can_cancel(ProjectStatus::Open));
        assert!(!project_can_cancel(ProjectStatus::InProgress));
        assert!(!project_can_cancel(ProjectStatus::Paid));

        assert!(project_can_resume(ProjectStatus::Cancelled));
        assert!(!project_can_resume(ProjectStatus::Open));

        assert!(project_can_complete(ProjectStatus::Paid));
        assert!(project_can_complete(ProjectStatus::InProgress));
        assert!(!project_can_complete(ProjectStatus::Completed));

        assert!(project_can_start_checkout(ProjectStatus::InProgress));
        assert!(!project_can_start_checkout(ProjectStatus::Open));
        assert!(!project_can_start_checkout(ProjectStatus::Paid));
    }

    #[test]
    fn order_lifecycle_guards() {
        assert!(order_can_start_checkout(OrderStatus::Accepted));
        assert!(!order_can_start_checkout(OrderStatus::Pending));
        assert!(!order_can_start_checkout(OrderStatus::Paid));

        assert!(order_can_complete(OrderStatus::Paid));
        assert!(order_can_complete(OrderStatus::Accepted));
        assert!(!order_can_complete(OrderStatus::Rejected));

        assert!(order_is_active(OrderStatus::Pending));
        assert!(order_is_active(OrderStatus::Accepted));
        assert!(!order_is_active(OrderStatus::Rejected));
        assert!(!order_is_active(OrderStatus::Completed));
    }

    #[test]
    fn accepting_a_bid_rejects_only_pending_siblings() {
        let winner = id();
        let pending = id();
        let rejected = id();
        let bids = vec![
            (winner, BidStatus::Pending),
            (pending, BidStatus::Pending),
            (rejected, BidStatus::Rejected),
        ];

        let plan = bids_rejected_on_accept(&bids, winner);
        assert_eq!(plan, vec![pending]);
    }

    #[test]
    fn repeated_accept_plans_no_further_rejections() {
        let winner = id();
        let loser = id();
        // State after the first accept ran.
        let bids = vec![(winner, BidStatus::Accepted), (loser, BidStatus::Rejected)];

        assert!(bids_rejected_on_accept(&bids, winner).is_empty());
    }

    #[test]
    fn cancelling_a_project_rejects_every_bid() {
        let bids = vec![
            (id(), BidStatus::Pending),
            (id(), BidStatus::Accepted),
            (id(), BidStatus::Rejected),
        ];

        assert_eq!(bids_rejected_on_cancel(&bids).len(), 3);
    }

    #[test]
    fn accepting_an_order_skips_completed_siblings() {
        let winner = id();
        let pending = id();
        let completed = id();
        let orders = vec![
            (winner, OrderStatus::Pending),
            (pending, OrderStatus::Pending),
            (completed, OrderStatus::Completed),
        ];

        let plan = orders_rejected_on_accept(&orders, winner);
        assert_eq!(plan, vec![pending]);
    }

    #[test]
    fn accepting_an_order_displaces_an_accepted_sibling() {
        let winner = id();
        let previous = id();
        let orders = vec![
            (winner, OrderStatus::Pending),
            (previous, OrderStatus::Accepted),
        ];

        assert_eq!(orders_rejected_on_accept(&orders, winner), vec![previous]);
    }

    #[test]
    fn cancelling_a_service_rejects_only_pending_orders() {
        let pending = id();
        let orders = vec![
            (pending, OrderStatus::Pending),
            (id(), OrderStatus::Accepted),
            (id(), OrderStatus::Completed),
        ];

        assert_eq!(orders_rejected_on_cancel(&orders), vec![pending]);
    }

    #[test]
    fn payment_terminality() {
        assert!(!payment_is_terminal(PaymentStatus::Pending));
        assert!(payment_is_terminal(PaymentStatus::Succeeded));
        assert!(payment_is_terminal(PaymentStatus::Canceled));
        assert!(payment_is_terminal(PaymentStatus::Failed));
    }
}
