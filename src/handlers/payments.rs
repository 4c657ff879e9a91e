use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::payments as payment_db;
use crate::engine::{EngineError, settlement};
use crate::models::payments::{CancelQuery, CheckoutRequest, CheckoutResponse, SuccessQuery};
use crate::models::users::Roles;
use crate::payments::{PaymentConfig, PaymentProvider};

/// POST /api/payments/checkout — the paying client starts a checkout for an
/// accepted order or in-progress project. Responds with the provider URL to
/// redirect the payer to.
pub async fn start_checkout(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    provider: web::Data<Arc<dyn PaymentProvider>>,
    cfg: web::Data<PaymentConfig>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, EngineError> {
    require_role(&user.0, Roles::Client)?;

    let started = settlement::start_checkout(
        db.get_ref(),
        provider.get_ref().as_ref(),
        cfg.get_ref(),
        body.owner,
        body.id,
        &user.0,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        payment_id: started.payment.id,
        session_url: started.session_url,
    }))
}

/// GET /api/payments/success?session_id=... — the provider redirects the
/// payer here after checkout. Reachable without authentication: the opaque
/// session id is the only correlation, and the provider is queried for the
/// authoritative outcome before anything changes.
pub async fn success_callback(
    db: web::Data<DatabaseConnection>,
    provider: web::Data<Arc<dyn PaymentProvider>>,
    query: web::Query<SuccessQuery>,
) -> Result<HttpResponse, EngineError> {
    let session_id = query.session_id.as_deref().unwrap_or("");
    let payment =
        settlement::handle_success(db.get_ref(), provider.get_ref().as_ref(), session_id).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// GET /api/payments/cancel?owner=order&id=... — the payer backed out of the
/// provider checkout page. Marks the newest still-pending payment canceled.
pub async fn cancel_navigation(
    db: web::Data<DatabaseConnection>,
    query: web::Query<CancelQuery>,
) -> Result<HttpResponse, EngineError> {
    let payment = settlement::handle_cancel(db.get_ref(), query.owner, query.id).await?;
    match payment {
        Some(payment) => Ok(HttpResponse::Ok().json(payment)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "no payment to cancel",
        }))),
    }
}

/// GET /api/payments/my — the authenticated user's payment history.
pub async fn my_payments(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match payment_db::get_payments_by_payer(db.get_ref(), user.0.id).await {
        Ok(payments) => HttpResponse::Ok().json(payments),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
