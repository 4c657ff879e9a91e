use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::bids as bid_db;
use crate::engine::{EngineError, matching};
use crate::models::bids::{CreateBid, UpdateBid};
use crate::models::users::Roles;

/// POST /api/bids — a freelancer bids on a project. One bid per
/// (project, freelancer); duplicates get `409 Conflict`.
pub async fn create_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateBid>,
) -> Result<HttpResponse, EngineError> {
    require_role(&user.0, Roles::Freelancer)?;

    let bid = matching::create_bid(db.get_ref(), body.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/bids/my — the authenticated freelancer's bids, newest first.
pub async fn my_bids(user: AuthenticatedUser, db: web::Data<DatabaseConnection>) -> impl Responder {
    match bid_db::get_bids_by_freelancer(db.get_ref(), user.0.id).await {
        Ok(bids) => HttpResponse::Ok().json(bids),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/bids/{id} — fetch a single bid.
pub async fn get_bid(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match bid_db::get_bid_by_id(db.get_ref(), id).await {
        Ok(Some(bid)) => HttpResponse::Ok().json(bid),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Bid {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/bids/{id} — the submitting freelancer edits a still-pending bid.
pub async fn update_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBid>,
) -> Result<HttpResponse, EngineError> {
    let bid =
        matching::update_own_bid(db.get_ref(), path.into_inner(), body.into_inner(), user.0.id)
            .await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// DELETE /api/bids/{id} — the submitting freelancer withdraws a pending bid.
pub async fn withdraw_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    matching::withdraw_bid(db.get_ref(), id, user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Bid {id} withdrawn"),
    })))
}

/// POST /api/bids/{id}/reject — the project owner turns a bid down.
pub async fn reject_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let bid = matching::reject_bid(db.get_ref(), path.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(bid))
}
