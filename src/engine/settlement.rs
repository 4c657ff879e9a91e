//! Payment settlement: opening checkout sessions against the external
//! provider and reconciling confirmed outcomes back into order/project
//! status.
//!
//! The provider's answer is authoritative. Local payment rows only move to a
//! terminal status after the provider confirms it, and a terminal payment is
//! never touched again — repeated success callbacks are no-ops, and the
//! owning order/project advances exactly once.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel, Set,
    TransactionTrait,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::{
    orders as order_db, payments as payment_db, projects as project_db, services as service_db,
};
use crate::engine::error::EngineError;
use crate::engine::{money, transitions};
use crate::models::orders::{self, OrderStatus};
use crate::models::payments::{self, OwnerKind, PaymentStatus};
use crate::models::projects::{self, ProjectStatus};
use crate::models::users;
use crate::payments::{
    CreateCheckoutSession, PaymentConfig, PaymentProvider, ProviderStatus, SessionStatus,
};

/// Provider calls get a few attempts with exponential backoff before the
/// failure is surfaced.
const PROVIDER_ATTEMPTS: u32 = 3;
const PROVIDER_BACKOFF_MS: u64 = 200;

/// A started checkout: the pending payment row plus the URL to send the
/// payer to.
#[derive(Debug)]
pub struct StartedCheckout {
    pub payment: payments::Model,
    pub session_url: String,
}

/// What the payer is actually buying, resolved from the owning resource.
struct CheckoutSubject {
    amount_minor: i64,
    description: String,
}

/// Validate the owning resource and compute the amount to charge.
async fn resolve_subject(
    txn: &DatabaseTransaction,
    owner: OwnerKind,
    owner_id: Uuid,
    payer_id: Uuid,
) -> Result<CheckoutSubject, EngineError> {
    match owner {
        OwnerKind::Order => {
            let order = order_db::get_order_by_id(txn, owner_id)
                .await?
                .ok_or_else(|| EngineError::not_found("order not found"))?;

            if order.client_id != payer_id {
                return Err(EngineError::forbidden(
                    "only the ordering client can pay for the order",
                ));
            }
            if !transitions::order_can_start_checkout(order.status) {
                return Err(EngineError::invalid_state(
                    "the order must be accepted before it can be paid",
                ));
            }

            let service = service_db::get_service_by_id(txn, order.service_id)
                .await?
                .ok_or_else(|| EngineError::not_found("service not found"))?;

            Ok(CheckoutSubject {
                amount_minor: money::to_minor_units(service.price),
                description: format!("Payment for order: {}", service.title),
            })
        }
        OwnerKind::Project => {
            let project = project_db::get_project_by_id(txn, owner_id)
                .await?
                .ok_or_else(|| EngineError::not_found("project not found"))?;

            if project.client_id != payer_id {
                return Err(EngineError::forbidden(
                    "only the project owner can pay for the project",
                ));
            }
            if !transitions::project_can_start_checkout(project.status) {
                return Err(EngineError::invalid_state(
                    "the project must be in progress before it can be paid",
                ));
            }

            Ok(CheckoutSubject {
                amount_minor: money::to_minor_units(project.budget),
                description: format!("Payment for project: {}", project.title),
            })
        }
    }
}

/// Start a checkout for an accepted order or an in-progress project.
///
/// The pending payment row is committed before the provider is called, so a
/// crash mid-flight leaves a visible pending payment rather than nothing;
/// the reconciliation sweep then resolves it. A provider call that fails
/// after all retries marks the payment `Failed` — it is never left pending
/// without a session id indefinitely.
pub async fn start_checkout(
    db: &DatabaseConnection,
    provider: &dyn PaymentProvider,
    cfg: &PaymentConfig,
    owner: OwnerKind,
    owner_id: Uuid,
    payer: &users::Model,
) -> Result<StartedCheckout, EngineError> {
    // Validate and insert atomically so the status check cannot go stale
    // between the read and the insert.
    let txn = db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;
    let subject = resolve_subject(&txn, owner, owner_id, payer.id).await?;
    let payment = payment_db::insert_payment(
        &txn,
        payment_db::NewPayment {
            owner,
            owner_id,
            payer_id: payer.id,
            amount_minor: subject.amount_minor,
            currency: cfg.currency.clone(),
            provider: provider.name().to_string(),
        },
    )
    .await?;
    txn.commit().await?;

    let request = CreateCheckoutSession {
        amount_minor: subject.amount_minor,
        currency: cfg.currency.clone(),
        description: subject.description,
        customer_email: payer.email.clone(),
        success_url: cfg.success_url.clone(),
        cancel_url: cfg.cancel_url.clone(),
        payment_id: payment.id,
    };

    let mut last_err = None;
    let mut session = None;
    for attempt in 0..PROVIDER_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_millis(
                PROVIDER_BACKOFF_MS * 2u64.pow(attempt - 1),
            ))
            .await;
        }
        match provider.create_checkout_session(&request).await {
            Ok(s) => {
                session = Some(s);
                break;
            }
            Err(e) if e.is_transient() => {
                warn!(payment_id = %payment.id, attempt, "checkout session attempt failed: {e}");
                last_err = Some(e);
            }
            Err(e) => {
                last_err = Some(e);
                break;
            }
        }
    }

    let Some(session) = session else {
        let reason = last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "provider returned no session".to_string());
        payment_db::set_payment_status(db, payment, PaymentStatus::Failed, None).await?;
        return Err(EngineError::Provider(reason));
    };

    let payment = payment_db::set_provider_session(db, payment, session.session_id).await?;
    info!(payment_id = %payment.id, amount_minor = payment.amount_minor, "checkout started");

    Ok(StartedCheckout {
        payment,
        session_url: session.session_url,
    })
}

/// Handle the payer returning on the success URL (or the sweep re-polling a
/// session): query the provider for the authoritative status and apply it.
pub async fn handle_success(
    db: &DatabaseConnection,
    provider: &dyn PaymentProvider,
    session_id: &str,
) -> Result<payments::Model, EngineError> {
    if session_id.trim().is_empty() {
        return Err(EngineError::BadRequest("session_id is missing".into()));
    }

    let payment = payment_db::get_payment_by_session_id(db, session_id)
        .await?
        .ok_or_else(|| EngineError::not_found("no payment for this session"))?;

    let status = match provider.get_session_status(session_id).await {
        Ok(status) => status,
        // One immediate retry for a transient blip; after that the sweep
        // picks the payment up again later.
        Err(e) if e.is_transient() => provider
            .get_session_status(session_id)
            .await
            .map_err(|e| EngineError::Provider(e.to_string()))?,
        Err(e) => return Err(EngineError::Provider(e.to_string())),
    };

    apply_session_status(db, payment.id, status).await
}

/// Apply a provider-confirmed session status to the payment and, on success,
/// advance the owning order/project exactly once.
///
/// Re-fetches the payment inside the transaction: if it is already terminal
/// the call is a no-op, which is what makes repeated callbacks safe.
pub async fn apply_session_status(
    db: &DatabaseConnection,
    payment_id: Uuid,
    status: SessionStatus,
) -> Result<payments::Model, EngineError> {
    let txn = db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;

    let payment = payment_db::get_payment_by_id(&txn, payment_id)
        .await?
        .ok_or_else(|| EngineError::not_found("payment not found"))?;

    if transitions::payment_is_terminal(payment.status) {
        txn.commit().await?;
        return Ok(payment);
    }

    let payment = match status.status {
        ProviderStatus::Succeeded => {
            let payment = payment_db::set_payment_status(
                &txn,
                payment,
                PaymentStatus::Succeeded,
                status.payment_intent_id,
            )
            .await?;
            advance_owner(&txn, &payment).await?;
            info!(payment_id = %payment.id, "payment succeeded");
            payment
        }
        ProviderStatus::Canceled => {
            payment_db::set_payment_status(
                &txn,
                payment,
                PaymentStatus::Canceled,
                status.payment_intent_id,
            )
            .await?
        }
        ProviderStatus::Failed => {
            payment_db::set_payment_status(
                &txn,
                payment,
                PaymentStatus::Failed,
                status.payment_intent_id,
            )
            .await?
        }
        // Unknown/Pending: transient, try again later, touch nothing.
        ProviderStatus::Unknown | ProviderStatus::Pending => payment,
    };

    txn.commit().await?;
    Ok(payment)
}

/// Advance the payment's owner on confirmed success: `Accepted → Paid` for
/// orders, `InProgress → Paid` for projects. The status guard means a second
/// application is a no-op rather than a double transition.
async fn advance_owner(
    txn: &DatabaseTransaction,
    payment: &payments::Model,
) -> Result<(), EngineError> {
    if let Some(order_id) = payment.order_id {
        if let Some(order) = order_db::get_order_by_id(txn, order_id).await? {
            if order.status == OrderStatus::Accepted {
                let mut active: orders::ActiveModel = order.into();
                active.status = Set(OrderStatus::Paid);
                active.update(txn).await?;
            }
        }
    } else if let Some(project_id) = payment.project_id {
        if let Some(project) = project_db::get_project_by_id(txn, project_id).await? {
            if project.status == ProjectStatus::InProgress {
                let mut active: projects::ActiveModel = project.into();
                active.status = Set(ProjectStatus::Paid);
                active.update(txn).await?;
            }
        }
    }
    Ok(())
}

/// Handle the payer navigating back via the cancel URL: the newest payment
/// for the owner is marked canceled if it is still pending. Terminal or
/// missing payments are left alone.
pub async fn handle_cancel(
    db: &DatabaseConnection,
    owner: OwnerKind,
    owner_id: Uuid,
) -> Result<Option<payments::Model>, EngineError> {
    let Some(payment) = payment_db::latest_payment_for_owner(db, owner, owner_id).await? else {
        return Ok(None);
    };

    if payment.status != PaymentStatus::Pending {
        return Ok(Some(payment));
    }

    let payment =
        payment_db::set_payment_status(db, payment, PaymentStatus::Canceled, None).await?;
    Ok(Some(payment))
}

/// One pass of the reconciliation sweep over stale pending payments.
///
/// Payments that never got a provider session are failed outright; the rest
/// are re-polled and resolved through the same path as the success callback.
/// Returns how many payments were looked at.
pub async fn reconcile_stale(
    db: &DatabaseConnection,
    provider: &dyn PaymentProvider,
    cfg: &PaymentConfig,
) -> Result<usize, EngineError> {
    let cutoff = chrono::Utc::now() - chrono::Duration::seconds(cfg.stale_after_secs);
    let stale = payment_db::get_stale_pending_payments(db, cutoff).await?;
    let count = stale.len();

    for payment in stale {
        let Some(session_id) = payment.provider_session_id.clone() else {
            warn!(payment_id = %payment.id, "pending payment without provider session, marking failed");
            payment_db::set_payment_status(db, payment, PaymentStatus::Failed, None).await?;
            continue;
        };

        match provider.get_session_status(&session_id).await {
            Ok(status) => {
                apply_session_status(db, payment.id, status).await?;
            }
            Err(e) => {
                warn!(payment_id = %payment.id, "sweep could not poll provider: {e}");
            }
        }
    }

    Ok(count)
}

/// Background loop driving [`reconcile_stale`] on the configured interval.
/// Spawned once at startup.
pub async fn run_reconciliation_sweep(
    db: DatabaseConnection,
    provider: Arc<dyn PaymentProvider>,
    cfg: PaymentConfig,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.sweep_interval_secs));
    // The first tick fires immediately; skip it so startup stays quiet.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match reconcile_stale(&db, provider.as_ref(), &cfg).await {
            Ok(0) => {}
            Ok(n) => info!(count = n, "reconciled stale pending payments"),
            Err(e) => error!("payment reconciliation sweep failed: {e}"),
        }
    }
}
