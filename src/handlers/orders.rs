use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::orders as order_db;
use crate::engine::{EngineError, matching};
use crate::models::orders::{CreateOrder, UpdateOrder};
use crate::models::users::Roles;

/// POST /api/orders — a client orders a service. One active order per
/// (service, client); duplicates get `409 Conflict`.
pub async fn create_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateOrder>,
) -> Result<HttpResponse, EngineError> {
    require_role(&user.0, Roles::Client)?;

    let order = matching::create_order(db.get_ref(), body.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Created().json(order))
}

/// GET /api/orders/my — the authenticated client's orders, newest first.
pub async fn my_orders(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match order_db::get_orders_by_client(db.get_ref(), user.0.id).await {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/orders/{id} — fetch a single order.
pub async fn get_order(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match order_db::get_order_by_id(db.get_ref(), id).await {
        Ok(Some(order)) => HttpResponse::Ok().json(order),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Order {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/orders/{id} — the ordering client edits a still-pending order.
pub async fn update_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrder>,
) -> Result<HttpResponse, EngineError> {
    let order =
        matching::update_own_order(db.get_ref(), path.into_inner(), body.into_inner(), user.0.id)
            .await?;
    Ok(HttpResponse::Ok().json(order))
}

/// DELETE /api/orders/{id} — the ordering client withdraws a pending order.
pub async fn withdraw_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    matching::withdraw_order(db.get_ref(), id, user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Order {id} withdrawn"),
    })))
}

/// POST /api/orders/{id}/reject — the service owner turns an order down.
pub async fn reject_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let order = matching::reject_order(db.get_ref(), path.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// POST /api/orders/{id}/complete — the client signs off on delivered work.
pub async fn complete_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let order = matching::complete_order(db.get_ref(), path.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(order))
}
